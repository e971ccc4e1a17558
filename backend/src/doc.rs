//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (users, meetings,
//!   health)
//! - **Schemas**: domain type wrappers from
//!   [`schemas`](crate::inbound::http::schemas) that provide OpenAPI
//!   definitions without coupling domain types to utoipa
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    AddressSchema, CoordinateSchema, ErrorCodeSchema, ErrorSchema, MeetingDetailsSchema,
    MeetingSchema, MeetingStatusSchema, RankedCandidateSchema, ServiceStatusSchema, UserSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NeighborGuard API",
        description = "Volunteer/recipient matching, meeting coordination and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::nearby_recipients,
        crate::inbound::http::users::get_user_by_email,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::meetings::create_meeting,
        crate::inbound::http::meetings::list_meetings,
        crate::inbound::http::meetings::cancel_meeting,
        crate::inbound::http::meetings::update_meeting_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        AddressSchema,
        CoordinateSchema,
        ServiceStatusSchema,
        MeetingSchema,
        MeetingStatusSchema,
        MeetingDetailsSchema,
        RankedCandidateSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Registration, profiles and recipient search"),
        (name = "meetings", description = "Meeting scheduling and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
