//! Driving port for user lookups.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch users without
//! importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Coordinate, EmailAddress, Error, Role, User, UserId};

/// Listing filter. `None` fields are not applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserListFilter {
    pub email: Option<EmailAddress>,
    pub role: Option<Role>,
    /// Keep users within 1 km of this point.
    pub centre: Option<Coordinate>,
    /// Keep users with (or without) any service needing assistance.
    pub requires_assistance: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    async fn list_users(&self, filter: UserListFilter) -> Result<Vec<User>, Error>;
}
