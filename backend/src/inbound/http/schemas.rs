//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their corresponding
//! domain types but live in the inbound adapter layer where framework
//! concerns belong.

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The resource is not available for the requested change.
    #[schema(rename = "conflict")]
    Conflict,
    /// Storage timed out or is unreachable; the request may be retried.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "no requested service is available for recipient")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Offending identifiers, e.g. `recipientId` and `services`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ServiceStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ServiceStatus)]
pub enum ServiceStatusSchema {
    #[schema(rename = "DO_NOT_NEED_ASSISTANCE")]
    DoNotNeedAssistance,
    #[schema(rename = "NEED_ASSISTANCE")]
    NeedAssistance,
    /// Claimed by a meeting.
    #[schema(rename = "IN_PROGRESS")]
    InProgress,
    #[schema(rename = "PROVIDE")]
    Provide,
    #[schema(rename = "DO_NOT_PROVIDE")]
    DoNotProvide,
}

/// OpenAPI schema for [`crate::domain::Coordinate`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Coordinate)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CoordinateSchema {
    #[schema(example = 32.0853)]
    latitude: f64,
    #[schema(example = 34.7818)]
    longitude: f64,
}

/// OpenAPI schema for [`crate::domain::Address`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Address, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AddressSchema {
    city: String,
    street: String,
    house_number: u32,
    apartment_number: u32,
}

/// OpenAPI schema for [`crate::domain::User`].
///
/// Contact details are flattened into the user object.
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "RECIPIENT")]
    role: String,
    first_name: String,
    last_name: String,
    age: u32,
    phone_number: String,
    #[schema(example = "FEMALE")]
    gender: Option<String>,
    #[schema(example = "dana@example.org")]
    email: String,
    address: AddressSchema,
    profile_image: Option<String>,
    languages: Vec<String>,
    /// Status per service name.
    services: BTreeMap<String, ServiceStatusSchema>,
    location: CoordinateSchema,
    /// Last "I'm OK" check-in.
    #[schema(rename = "lastOK", value_type = String, format = DateTime)]
    last_ok: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::MeetingStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MeetingStatus)]
pub enum MeetingStatusSchema {
    #[schema(rename = "IN_PROGRESS")]
    InProgress,
    #[schema(rename = "DONE")]
    Done,
}

/// OpenAPI schema for [`crate::domain::Meeting`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Meeting, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MeetingSchema {
    id: String,
    recipient_id: String,
    volunteer_id: String,
    #[schema(value_type = String, format = DateTime)]
    scheduled_at: String,
    /// Services actually claimed by this meeting.
    services: Vec<String>,
    status: MeetingStatusSchema,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::MeetingDetails`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MeetingDetails, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MeetingDetailsSchema {
    meeting: MeetingSchema,
    recipient: Option<UserSchema>,
    volunteer: Option<UserSchema>,
    /// Set when a participant could not be loaded.
    partial_data_warning: bool,
}

/// OpenAPI schema for a ranked recipient returned by the nearby search.
#[derive(ToSchema)]
#[schema(as = crate::domain::RankedCandidate, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RankedCandidateSchema {
    recipient: UserSchema,
    /// Services the recipient needs and the volunteer provides.
    matched_services: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_lists_wire_codes() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        for code in ["invalid_request", "not_found", "conflict", "service_unavailable"] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn error_schema_uses_camel_case_trace_id() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(!schema_json.contains("trace_id"));
    }

    #[rstest]
    fn user_schema_keeps_last_ok_spelling() {
        let schema_json = schema_to_json::<UserSchema>();
        assert_eq!(UserSchema::name(), "crate.domain.User");
        assert!(schema_json.contains("lastOK"));
        assert!(schema_json.contains("firstName"));
    }

    #[rstest]
    fn service_status_schema_uses_wire_values() {
        let schema_json = schema_to_json::<ServiceStatusSchema>();
        assert!(schema_json.contains("NEED_ASSISTANCE"));
        assert!(schema_json.contains("DO_NOT_PROVIDE"));
    }
}
