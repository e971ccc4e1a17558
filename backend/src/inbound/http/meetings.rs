//! Meetings API handlers.
//!
//! ```text
//! POST   /api/v1/meetings
//! GET    /api/v1/meetings?userId=&status=
//! DELETE /api/v1/meetings/{id}?userId=
//! PUT    /api/v1/meetings/{id}/status {"status":"DONE"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::MeetingDetails;
use crate::domain::ports::{
    CancelMeetingRequest, CreateMeetingRequest, MeetingFilter, UpdateMeetingStatusRequest,
};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MeetingDetailsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_meeting_id, parse_meeting_status, parse_optional_user_id,
    parse_rfc3339_timestamp, parse_service_name, parse_user_id, require,
};

/// Body for `POST /api/v1/meetings`.
///
/// Example JSON:
/// `{"recipientId":"…","volunteerId":"…","services":["Cooking"],
/// "scheduledAt":"2024-05-02T10:00:00Z"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingBody {
    pub recipient_id: Option<String>,
    pub volunteer_id: Option<String>,
    pub services: Option<Vec<String>>,
    /// RFC 3339 timestamp.
    pub scheduled_at: Option<String>,
}

impl TryFrom<CreateMeetingBody> for CreateMeetingRequest {
    type Error = Error;

    fn try_from(value: CreateMeetingBody) -> Result<Self, Self::Error> {
        let recipient_field = FieldName::new("recipientId");
        let volunteer_field = FieldName::new("volunteerId");
        let services_field = FieldName::new("services");
        let scheduled_field = FieldName::new("scheduledAt");

        let recipient_id = require(value.recipient_id, recipient_field)?;
        let volunteer_id = require(value.volunteer_id, volunteer_field)?;
        let scheduled_at = require(value.scheduled_at, scheduled_field)?;
        let services = require(value.services, services_field)?
            .iter()
            .map(|name| parse_service_name(name, services_field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            recipient_id: parse_user_id(&recipient_id, recipient_field)?,
            volunteer_id: parse_user_id(&volunteer_id, volunteer_field)?,
            services,
            scheduled_at: parse_rfc3339_timestamp(&scheduled_at, scheduled_field)?,
        })
    }
}

/// Body for `PUT /api/v1/meetings/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MeetingStatusBody {
    /// `IN_PROGRESS` or `DONE`.
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListMeetingsParams {
    /// Keep meetings where this user is either participant.
    pub user_id: Option<String>,
    /// `IN_PROGRESS` or `DONE`.
    pub status: Option<String>,
}

impl TryFrom<ListMeetingsParams> for MeetingFilter {
    type Error = Error;

    fn try_from(value: ListMeetingsParams) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: parse_optional_user_id(value.user_id.as_deref(), FieldName::new("userId"))?,
            status: value
                .status
                .as_deref()
                .map(|raw| parse_meeting_status(raw, FieldName::new("status")))
                .transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CancelMeetingParams {
    /// The participant cancelling the meeting.
    pub user_id: Option<String>,
}

/// Schedule a meeting and claim the requested services.
///
/// Services that are not currently needed are dropped from the meeting; the
/// request fails with 409 only when none can be claimed.
#[utoipa::path(
    post,
    path = "/api/v1/meetings",
    request_body = CreateMeetingBody,
    responses(
        (status = 201, description = "Meeting created", body = MeetingDetailsSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Participant not found", body = ErrorSchema),
        (status = 409, description = "No requested service is available", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["meetings"],
    operation_id = "createMeeting"
)]
#[post("/meetings")]
pub async fn create_meeting(
    state: web::Data<HttpState>,
    payload: web::Json<CreateMeetingBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateMeetingRequest::try_from(payload.into_inner())?;
    let details = state.meetings.create_meeting(request).await?;
    Ok(HttpResponse::Created().json(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings",
    params(ListMeetingsParams),
    responses(
        (status = 200, description = "Meetings, oldest first", body = [MeetingDetailsSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["meetings"],
    operation_id = "listMeetings"
)]
#[get("/meetings")]
pub async fn list_meetings(
    state: web::Data<HttpState>,
    params: web::Query<ListMeetingsParams>,
) -> ApiResult<web::Json<Vec<MeetingDetails>>> {
    let filter = MeetingFilter::try_from(params.into_inner())?;
    Ok(web::Json(state.meetings_query.list_meetings(filter).await?))
}

/// Cancel a meeting. When the volunteer cancels, claimed services return to
/// needing assistance.
#[utoipa::path(
    delete,
    path = "/api/v1/meetings/{id}",
    params(
        ("id" = String, Path, description = "Meeting identifier"),
        CancelMeetingParams
    ),
    responses(
        (status = 204, description = "Meeting cancelled"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Meeting or user not found", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["meetings"],
    operation_id = "cancelMeeting"
)]
#[delete("/meetings/{id}")]
pub async fn cancel_meeting(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<CancelMeetingParams>,
) -> ApiResult<HttpResponse> {
    let meeting_id = parse_meeting_id(&path.into_inner(), FieldName::new("id"))?;
    let user_field = FieldName::new("userId");
    let raw_user = require(params.into_inner().user_id, user_field)?;
    let acting_user_id = parse_user_id(&raw_user, user_field)?;
    state
        .meetings
        .cancel_meeting(CancelMeetingRequest {
            meeting_id,
            acting_user_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    put,
    path = "/api/v1/meetings/{id}/status",
    params(("id" = String, Path, description = "Meeting identifier")),
    request_body = MeetingStatusBody,
    responses(
        (status = 200, description = "Updated meeting", body = MeetingDetailsSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Meeting not found", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["meetings"],
    operation_id = "updateMeetingStatus"
)]
#[put("/meetings/{id}/status")]
pub async fn update_meeting_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<MeetingStatusBody>,
) -> ApiResult<web::Json<MeetingDetails>> {
    let meeting_id = parse_meeting_id(&path.into_inner(), FieldName::new("id"))?;
    let status_field = FieldName::new("status");
    let raw_status = require(payload.into_inner().status, status_field)?;
    let status = parse_meeting_status(&raw_status, status_field)?;
    let details = state
        .meetings
        .update_meeting_status(UpdateMeetingStatusRequest { meeting_id, status })
        .await?;
    Ok(web::Json(details))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Duration;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        MockMeetingCommand, MockMeetingQuery, MockRecipientMatchingQuery, MockUserCommand,
        MockUsersQuery,
    };
    use crate::domain::{Meeting, MeetingDraft, MeetingId, MeetingStatus, ServiceName, UserId};
    use crate::test_support::users::epoch;

    fn details() -> MeetingDetails {
        let meeting = Meeting::new(MeetingDraft {
            id: MeetingId::random(),
            recipient_id: UserId::random(),
            volunteer_id: UserId::random(),
            scheduled_at: epoch() + Duration::days(1),
            services: vec![ServiceName::new("Cooking").expect("valid name")],
            now: epoch(),
        })
        .expect("valid meeting");
        MeetingDetails {
            meeting,
            recipient: None,
            volunteer: None,
            partial_data_warning: true,
        }
    }

    async fn call(
        command: MockMeetingCommand,
        query: MockMeetingQuery,
        request: actix_test::TestRequest,
    ) -> (StatusCode, Value) {
        let state = HttpState {
            users: Arc::new(MockUsersQuery::new()),
            user_commands: Arc::new(MockUserCommand::new()),
            matching: Arc::new(MockRecipientMatchingQuery::new()),
            meetings: Arc::new(command),
            meetings_query: Arc::new(query),
        };
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api/v1")
                    .service(create_meeting)
                    .service(list_meetings)
                    .service(cancel_meeting)
                    .service(update_meeting_status),
            ),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    #[actix_web::test]
    async fn create_returns_created_details() {
        let mut command = MockMeetingCommand::new();
        command
            .expect_create_meeting()
            .withf(|request| request.services.len() == 2)
            .return_once(|_| Ok(details()));

        let (status, body) = call(
            command,
            MockMeetingQuery::new(),
            actix_test::TestRequest::post().uri("/api/v1/meetings").set_json(json!({
                "recipientId": UserId::random().to_string(),
                "volunteerId": UserId::random().to_string(),
                "services": ["Cooking", "Shopping"],
                "scheduledAt": "2024-05-02T10:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["meeting"]["status"], json!("IN_PROGRESS"));
        assert_eq!(body["partialDataWarning"], json!(true));
    }

    #[rstest]
    #[case(json!({"volunteerId": "x", "services": [], "scheduledAt": "x"}), "recipientId")]
    #[case(
        json!({"recipientId": "nope", "volunteerId": "nope", "services": ["Cooking"], "scheduledAt": "2024-05-02T10:00:00Z"}),
        "recipientId"
    )]
    #[case(
        json!({"recipientId": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "volunteerId": "3fa85f64-5717-4562-b3fc-2c963f66afa7", "services": ["Cooking"], "scheduledAt": "tomorrow"}),
        "scheduledAt"
    )]
    #[actix_web::test]
    async fn create_validates_payload(#[case] payload: Value, #[case] field: &str) {
        let mut command = MockMeetingCommand::new();
        command.expect_create_meeting().never();
        let (status, body) = call(
            command,
            MockMeetingQuery::new(),
            actix_test::TestRequest::post()
                .uri("/api/v1/meetings")
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!(field));
    }

    #[actix_web::test]
    async fn conflict_maps_to_409() {
        let mut command = MockMeetingCommand::new();
        command
            .expect_create_meeting()
            .return_once(|_| Err(Error::conflict("no requested service is available")));
        let (status, body) = call(
            command,
            MockMeetingQuery::new(),
            actix_test::TestRequest::post().uri("/api/v1/meetings").set_json(json!({
                "recipientId": UserId::random().to_string(),
                "volunteerId": UserId::random().to_string(),
                "services": ["Cooking"],
                "scheduledAt": "2024-05-02T10:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("conflict"));
    }

    #[actix_web::test]
    async fn list_parses_filters() {
        let user_id = UserId::random();
        let expected = user_id.clone();
        let mut query = MockMeetingQuery::new();
        query
            .expect_list_meetings()
            .withf(move |filter| {
                filter.user_id.as_ref() == Some(&expected)
                    && filter.status == Some(MeetingStatus::Done)
            })
            .return_once(|_| Ok(vec![details()]));

        let (status, body) = call(
            MockMeetingCommand::new(),
            query,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/meetings?userId={user_id}&status=DONE")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn unknown_status_filter_is_rejected() {
        let mut query = MockMeetingQuery::new();
        query.expect_list_meetings().never();
        let (status, _) = call(
            MockMeetingCommand::new(),
            query,
            actix_test::TestRequest::get().uri("/api/v1/meetings?status=FINISHED"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn cancel_requires_acting_user() {
        let mut command = MockMeetingCommand::new();
        command.expect_cancel_meeting().never();
        let (status, body) = call(
            command,
            MockMeetingQuery::new(),
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/meetings/{}", MeetingId::random())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], json!("missing_field"));
    }

    #[actix_web::test]
    async fn cancel_returns_no_content() {
        let meeting_id = MeetingId::random();
        let user_id = UserId::random();
        let expected_user = user_id.clone();
        let mut command = MockMeetingCommand::new();
        command
            .expect_cancel_meeting()
            .withf(move |request| {
                request.meeting_id == meeting_id && request.acting_user_id == expected_user
            })
            .return_once(|_| Ok(()));

        let (status, body) = call(
            command,
            MockMeetingQuery::new(),
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/meetings/{meeting_id}?userId={user_id}")),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }

    #[actix_web::test]
    async fn status_update_accepts_done() {
        let mut command = MockMeetingCommand::new();
        command
            .expect_update_meeting_status()
            .withf(|request| request.status == MeetingStatus::Done)
            .return_once(|_| Ok(details()));

        let (status, _) = call(
            command,
            MockMeetingQuery::new(),
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/meetings/{}/status", MeetingId::random()))
                .set_json(json!({"status": "DONE"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
