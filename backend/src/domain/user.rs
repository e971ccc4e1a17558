//! User data model shared by recipients and volunteers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Coordinate, ServiceName, ServiceStatus};

/// Validation errors returned when building users and their components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain a single @ between a local part and a domain")]
    InvalidEmail,
    #[error("first name must not be empty")]
    EmptyFirstName,
    #[error("service {service} cannot be {status} for a {role}")]
    StatusNotAllowedForRole {
        service: ServiceName,
        status: ServiceStatus,
        role: Role,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Whether a user offers or receives assistance. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Volunteer,
    Recipient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Volunteer => "volunteer",
            Self::Recipient => "recipient",
        })
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VOLUNTEER" => Ok(Self::Volunteer),
            "RECIPIENT" => Ok(Self::Recipient),
            other => Err(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Normalised email address used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address and fold it to lower case.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_lowercase()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house_number: u32,
    pub apartment_number: u32,
}

/// Profile details shown to the other party of a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub phone_number: String,
    pub gender: Option<Gender>,
    pub email: EmailAddress,
    pub address: Address,
    pub profile_image: Option<String>,
}

/// Input payload for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub role: Role,
    pub contact: ContactDetails,
    pub languages: Vec<String>,
    pub services: BTreeMap<ServiceName, ServiceStatus>,
    pub location: Coordinate,
    pub last_ok: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application user.
///
/// ## Invariants
/// - `role` never changes after construction.
/// - every service status is valid for `role`.
/// - recipients always carry a `"General Check"` entry.
/// - service statuses are only rewritten by the service state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    role: Role,
    contact: ContactDetails,
    languages: BTreeSet<String>,
    services: BTreeMap<ServiceName, ServiceStatus>,
    location: Coordinate,
    last_ok: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a validated user.
    ///
    /// Recipients without a `"General Check"` entry receive one set to
    /// [`ServiceStatus::DoNotNeedAssistance`].
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            role,
            contact,
            languages,
            mut services,
            location,
            last_ok,
            created_at,
            updated_at,
        } = draft;

        if contact.first_name.trim().is_empty() {
            return Err(UserValidationError::EmptyFirstName);
        }
        if let Some((service, status)) = services
            .iter()
            .find(|(_, status)| !status.is_valid_for(role))
        {
            return Err(UserValidationError::StatusNotAllowedForRole {
                service: service.clone(),
                status: *status,
                role,
            });
        }
        if role == Role::Recipient {
            services
                .entry(ServiceName::general_check())
                .or_insert(ServiceStatus::DoNotNeedAssistance);
        }

        Ok(Self {
            id,
            role,
            contact,
            languages: normalise_languages(languages),
            services,
            location,
            last_ok,
            created_at,
            updated_at,
        })
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Volunteer or recipient.
    pub fn role(&self) -> Role {
        self.role
    }

    /// `true` for recipients.
    pub fn is_recipient(&self) -> bool {
        self.role == Role::Recipient
    }

    /// `true` for volunteers.
    pub fn is_volunteer(&self) -> bool {
        self.role == Role::Volunteer
    }

    /// Contact and profile details.
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// Unique, normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.contact.email
    }

    /// Spoken languages, lowercased.
    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    /// Service name to current status.
    pub fn services(&self) -> &BTreeMap<ServiceName, ServiceStatus> {
        &self.services
    }

    /// Status of `service`, if the user lists it at all.
    pub fn service_status(&self, service: &ServiceName) -> Option<ServiceStatus> {
        self.services.get(service).copied()
    }

    /// Last known home location.
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// When the recipient last confirmed they are fine.
    pub fn last_ok(&self) -> DateTime<Utc> {
        self.last_ok
    }

    /// When the user registered.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the user record last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Languages spoken by both users.
    pub fn shared_languages<'a>(&'a self, other: &'a User) -> impl Iterator<Item = &'a String> {
        self.languages.intersection(&other.languages)
    }

    /// Whether any service of this user has `status`.
    pub fn has_service_in(&self, status: ServiceStatus) -> bool {
        self.services.values().any(|current| *current == status)
    }

    pub(crate) fn set_service_status(&mut self, service: ServiceName, status: ServiceStatus) {
        self.services.insert(service, status);
    }

    pub(crate) fn set_contact(&mut self, contact: ContactDetails) {
        self.contact = contact;
    }

    pub(crate) fn set_languages(&mut self, languages: Vec<String>) {
        self.languages = normalise_languages(languages);
    }

    pub(crate) fn set_location(&mut self, location: Coordinate) {
        self.location = location;
    }

    pub(crate) fn set_last_ok(&mut self, last_ok: DateTime<Utc>) {
        self.last_ok = last_ok;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

fn normalise_languages(languages: Vec<String>) -> BTreeSet<String> {
    languages
        .into_iter()
        .map(|language| language.trim().to_owned())
        .filter(|language| !language.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: UserId,
    role: Role,
    #[serde(flatten)]
    contact: ContactDetails,
    languages: Vec<String>,
    services: BTreeMap<ServiceName, ServiceStatus>,
    location: Coordinate,
    #[serde(rename = "lastOK")]
    last_ok: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            role,
            contact,
            languages,
            services,
            location,
            last_ok,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            role,
            contact,
            languages: languages.into_iter().collect(),
            services,
            location,
            last_ok,
            created_at,
            updated_at,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::new(UserDraft {
            id: value.id,
            role: value.role,
            contact: value.contact,
            languages: value.languages,
            services: value.services,
            location: value.location,
            last_ok: value.last_ok,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[cfg(test)]
mod tests;
