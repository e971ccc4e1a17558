//! Driving port for user registration and profile updates.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ContactDetails, Coordinate, Error, Role, ServiceName, ServiceStatus, User, UserId,
};

/// Registration payload; id and timestamps are assigned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub role: Role,
    pub contact: ContactDetails,
    pub languages: Vec<String>,
    pub services: BTreeMap<ServiceName, ServiceStatus>,
    pub location: Coordinate,
}

/// Fields to replace on an existing user. The role cannot change.
///
/// For recipients, each requested service status is applied through the
/// service state machine rather than written directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub contact: Option<ContactDetails>,
    pub languages: Option<Vec<String>>,
    pub services: Option<BTreeMap<ServiceName, ServiceStatus>>,
    pub location: Option<Coordinate>,
    pub last_ok: Option<DateTime<Utc>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    async fn create_user(&self, request: NewUser) -> Result<User, Error>;

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, Error>;
}
