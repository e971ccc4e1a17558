//! Service names and per-service assistance statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Service whose need is inferred from how long a recipient has been silent.
pub const GENERAL_CHECK: &str = "General Check";

/// Validation errors for [`ServiceName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceNameValidationError {
    #[error("service name must not be empty")]
    Empty,
    #[error("service name must not have leading or trailing whitespace")]
    Untrimmed,
}

/// Name of a kind of assistance, e.g. `"Cooking"` or `"General Check"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Validate and construct a service name.
    pub fn new(name: impl Into<String>) -> Result<Self, ServiceNameValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ServiceNameValidationError::Empty);
        }
        if name.trim() != name {
            return Err(ServiceNameValidationError::Untrimmed);
        }
        Ok(Self(name))
    }

    /// The staleness-driven general wellbeing check.
    #[must_use]
    pub fn general_check() -> Self {
        Self(GENERAL_CHECK.to_owned())
    }

    /// Whether this is the general wellbeing check.
    #[must_use]
    pub fn is_general_check(&self) -> bool {
        self.0 == GENERAL_CHECK
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ServiceName> for String {
    fn from(value: ServiceName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ServiceName {
    type Error = ServiceNameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Status of one service for one user.
///
/// Recipients hold the three assistance statuses; volunteers hold the two
/// provision statuses. [`ServiceStatus::is_valid_for`] enforces the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    DoNotNeedAssistance,
    NeedAssistance,
    InProgress,
    Provide,
    DoNotProvide,
}

impl ServiceStatus {
    /// Whether a user with `role` may hold this status.
    #[must_use]
    pub fn is_valid_for(self, role: Role) -> bool {
        match role {
            Role::Recipient => matches!(
                self,
                Self::DoNotNeedAssistance | Self::NeedAssistance | Self::InProgress
            ),
            Role::Volunteer => matches!(self, Self::Provide | Self::DoNotProvide),
        }
    }

    /// Wire representation used in JSON payloads and query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoNotNeedAssistance => "DO_NOT_NEED_ASSISTANCE",
            Self::NeedAssistance => "NEED_ASSISTANCE",
            Self::InProgress => "IN_PROGRESS",
            Self::Provide => "PROVIDE",
            Self::DoNotProvide => "DO_NOT_PROVIDE",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service status: {0}")]
pub struct ParseServiceStatusError(pub String);

impl FromStr for ServiceStatus {
    type Err = ParseServiceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DO_NOT_NEED_ASSISTANCE" => Ok(Self::DoNotNeedAssistance),
            "NEED_ASSISTANCE" => Ok(Self::NeedAssistance),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "PROVIDE" => Ok(Self::Provide),
            "DO_NOT_PROVIDE" => Ok(Self::DoNotProvide),
            other => Err(ParseServiceStatusError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_service_names_are_rejected(#[case] raw: &str) {
        assert_eq!(ServiceName::new(raw), Err(ServiceNameValidationError::Empty));
    }

    #[rstest]
    fn padded_service_names_are_rejected() {
        assert_eq!(
            ServiceName::new(" Cooking"),
            Err(ServiceNameValidationError::Untrimmed)
        );
    }

    #[rstest]
    fn general_check_is_recognised() {
        assert!(ServiceName::general_check().is_general_check());
        let cooking = ServiceName::new("Cooking").expect("valid name");
        assert!(!cooking.is_general_check());
    }

    #[rstest]
    #[case(ServiceStatus::NeedAssistance, Role::Recipient, true)]
    #[case(ServiceStatus::InProgress, Role::Recipient, true)]
    #[case(ServiceStatus::Provide, Role::Recipient, false)]
    #[case(ServiceStatus::Provide, Role::Volunteer, true)]
    #[case(ServiceStatus::NeedAssistance, Role::Volunteer, false)]
    fn statuses_are_partitioned_by_role(
        #[case] status: ServiceStatus,
        #[case] role: Role,
        #[case] expected: bool,
    ) {
        assert_eq!(status.is_valid_for(role), expected);
    }

    #[rstest]
    fn status_wire_format_is_screaming_snake_case() {
        let json = serde_json::to_string(&ServiceStatus::DoNotNeedAssistance).expect("serialise");
        assert_eq!(json, "\"DO_NOT_NEED_ASSISTANCE\"");
        assert_eq!(
            "DO_NOT_PROVIDE".parse::<ServiceStatus>(),
            Ok(ServiceStatus::DoNotProvide)
        );
        assert!("MAYBE".parse::<ServiceStatus>().is_err());
    }
}
