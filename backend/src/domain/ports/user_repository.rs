//! Port abstraction for user persistence adapters and their errors.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ContactDetails, Coordinate, EmailAddress, Role, ServiceName, ServiceStatus, User, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique key (id or email) is already taken.
        Duplicate { message: String } => "user repository duplicate key: {message}",
    }
}

/// Store-side selection of users. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub email: Option<EmailAddress>,
}

impl UserFilter {
    /// Filter selecting recipients only.
    pub fn recipients() -> Self {
        Self {
            role: Some(Role::Recipient),
            email: None,
        }
    }

    /// Whether `user` passes every set criterion.
    pub fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role() == role)
            && self.email.as_ref().is_none_or(|email| user.email() == email)
    }
}

/// Partial update applied by [`UserRepository::update`].
///
/// The role and identifier are never part of a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPatch {
    pub contact: Option<ContactDetails>,
    pub languages: Option<Vec<String>>,
    pub services: Option<BTreeMap<ServiceName, ServiceStatus>>,
    pub location: Option<Coordinate>,
    pub last_ok: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl UserPatch {
    /// Patch touching nothing but `updatedAt`.
    pub fn empty(updated_at: DateTime<Utc>) -> Self {
        Self {
            contact: None,
            languages: None,
            services: None,
            location: None,
            last_ok: None,
            updated_at,
        }
    }

    /// Patch persisting only the service statuses of `user`.
    pub fn services_of(user: &User, updated_at: DateTime<Utc>) -> Self {
        Self {
            services: Some(user.services().clone()),
            ..Self::empty(updated_at)
        }
    }

    /// Patch persisting every mutable field of `user`.
    pub fn full(user: &User) -> Self {
        Self {
            contact: Some(user.contact().clone()),
            languages: Some(user.languages().iter().cloned().collect()),
            services: Some(user.services().clone()),
            location: Some(user.location()),
            last_ok: Some(user.last_ok()),
            updated_at: user.updated_at(),
        }
    }

    pub(crate) fn apply_to(&self, user: &mut User) {
        if let Some(contact) = &self.contact {
            user.set_contact(contact.clone());
        }
        if let Some(languages) = &self.languages {
            user.set_languages(languages.clone());
        }
        if let Some(services) = &self.services {
            for (service, status) in services {
                user.set_service_status(service.clone(), *status);
            }
        }
        if let Some(location) = self.location {
            user.set_location(location);
        }
        if let Some(last_ok) = self.last_ok {
            user.set_last_ok(last_ok);
        }
        user.touch(self.updated_at);
    }
}

/// Document-store style access to users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn get(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// List users matching `query`.
    async fn query(&self, query: &UserFilter) -> Result<Vec<User>, UserRepositoryError>;

    /// Insert a new user; fails with `Duplicate` on a taken id or email.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Apply `patch` to an existing user; fails with `Query` when absent.
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<(), UserRepositoryError>;
}
