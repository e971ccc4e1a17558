//! Failures raised by the matching, meeting and user services.

use serde_json::json;

use crate::domain::{EmailAddress, Error, MeetingId, ServiceName, UserId};

/// Coarse category of an [`AssistanceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    StorageTimeout,
    StorageUnavailable,
}

/// Closed set of assistance failures with the offending identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistanceError {
    #[error("recipient {recipient_id} not found")]
    RecipientNotFound { recipient_id: UserId },
    #[error("volunteer {volunteer_id} not found")]
    VolunteerNotFound { volunteer_id: UserId },
    #[error("user {user_id} not found")]
    UserNotFound { user_id: UserId },
    #[error("no user registered with email {email}")]
    UserEmailNotFound { email: EmailAddress },
    #[error("meeting {meeting_id} not found")]
    MeetingNotFound { meeting_id: MeetingId },
    #[error("no requested service is available for recipient {recipient_id}")]
    AlreadyInProgress {
        recipient_id: UserId,
        services: Vec<ServiceName>,
    },
    #[error("email {email} is already registered")]
    EmailAlreadyRegistered { email: EmailAddress },
    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },
    #[error("storage operation {operation} timed out")]
    StorageTimeout { operation: &'static str },
    #[error("storage operation {operation} failed: {message}")]
    StorageUnavailable {
        operation: &'static str,
        message: String,
    },
}

impl AssistanceError {
    /// Malformed input on `field`.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Coarse category used for HTTP mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RecipientNotFound { .. }
            | Self::VolunteerNotFound { .. }
            | Self::UserNotFound { .. }
            | Self::UserEmailNotFound { .. }
            | Self::MeetingNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyInProgress { .. } | Self::EmailAlreadyRegistered { .. } => {
                ErrorKind::Conflict
            }
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::StorageTimeout { .. } => ErrorKind::StorageTimeout,
            Self::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
        }
    }

    /// Storage failures may succeed on retry; everything else will not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StorageTimeout | ErrorKind::StorageUnavailable
        )
    }

    fn details(&self) -> serde_json::Value {
        match self {
            Self::RecipientNotFound { recipient_id } => json!({ "recipientId": recipient_id }),
            Self::VolunteerNotFound { volunteer_id } => json!({ "volunteerId": volunteer_id }),
            Self::UserNotFound { user_id } => json!({ "userId": user_id }),
            Self::UserEmailNotFound { email } => json!({ "email": email }),
            Self::MeetingNotFound { meeting_id } => json!({ "meetingId": meeting_id }),
            Self::AlreadyInProgress {
                recipient_id,
                services,
            } => json!({ "recipientId": recipient_id, "services": services }),
            Self::EmailAlreadyRegistered { email } => json!({ "email": email }),
            Self::InvalidInput { field, .. } => json!({ "field": field }),
            Self::StorageTimeout { operation } | Self::StorageUnavailable { operation, .. } => {
                json!({ "operation": operation, "retryable": true })
            }
        }
    }
}

impl From<AssistanceError> for Error {
    fn from(value: AssistanceError) -> Self {
        let details = value.details();
        let error = match value.kind() {
            ErrorKind::NotFound => Error::not_found(value.to_string()),
            ErrorKind::Conflict => Error::conflict(value.to_string()),
            ErrorKind::InvalidInput => Error::invalid_request(value.to_string()),
            ErrorKind::StorageTimeout | ErrorKind::StorageUnavailable => {
                Error::service_unavailable(value.to_string())
            }
        };
        error.with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(AssistanceError::UserNotFound { user_id: UserId::random() }, ErrorCode::NotFound, false)]
    #[case(
        AssistanceError::AlreadyInProgress { recipient_id: UserId::random(), services: vec![] },
        ErrorCode::Conflict,
        false
    )]
    #[case(AssistanceError::invalid_input("status", "unknown"), ErrorCode::InvalidRequest, false)]
    #[case(
        AssistanceError::StorageTimeout { operation: "users.get" },
        ErrorCode::ServiceUnavailable,
        true
    )]
    #[case(
        AssistanceError::StorageUnavailable { operation: "users.get", message: "down".into() },
        ErrorCode::ServiceUnavailable,
        true
    )]
    fn maps_to_domain_error_codes(
        #[case] error: AssistanceError,
        #[case] code: ErrorCode,
        #[case] retryable: bool,
    ) {
        assert_eq!(error.is_retryable(), retryable);
        assert_eq!(Error::from(error).code(), code);
    }

    #[rstest]
    fn conflict_details_name_recipient_and_services() {
        let recipient_id = UserId::random();
        let services = vec![ServiceName::new("Cooking").expect("valid name")];
        let error: Error = AssistanceError::AlreadyInProgress {
            recipient_id: recipient_id.clone(),
            services,
        }
        .into();
        assert_eq!(
            error.details(),
            Some(&json!({
                "recipientId": recipient_id.to_string(),
                "services": ["Cooking"],
            }))
        );
    }
}
