//! Tests for HTTP error mapping.

use super::*;
use crate::domain::{AssistanceError, Error, UserId};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("boom")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn conflict_case(expected_trace_id: String) -> Error {
    Error::conflict("taken")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"recipientId": "r-1", "services": ["Cooking"]}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("slow"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");

    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn error_responses_include_trace_id_and_payloads(
    #[from(internal_error_case)] internal_error: Error,
    #[from(conflict_case)] conflict: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());

    let payload = assert_error_response(
        conflict,
        StatusCode::CONFLICT,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(payload.message(), "taken");
    assert_eq!(
        payload.details(),
        Some(&json!({"recipientId": "r-1", "services": ["Cooking"]}))
    );
}

#[rstest]
#[actix_web::test]
async fn storage_failures_surface_as_retryable_503() {
    let error = Error::from(AssistanceError::StorageTimeout {
        operation: "users.get",
    });

    let response = ResponseError::error_response(&error);
    let retry_after = response
        .headers()
        .get(actix_web::http::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(retry_after, Some(RETRY_AFTER_SECS.to_string()));

    let payload = assert_error_response(error, StatusCode::SERVICE_UNAVAILABLE, None).await;
    assert_eq!(payload.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(
        payload.details(),
        Some(&json!({"operation": "users.get", "retryable": true}))
    );
}

#[rstest]
#[actix_web::test]
async fn not_found_payload_names_the_missing_user() {
    let user_id = UserId::random();
    let error = Error::from(AssistanceError::UserNotFound {
        user_id: user_id.clone(),
    });

    let payload = assert_error_response(error, StatusCode::NOT_FOUND, None).await;
    assert_eq!(payload.trace_id(), None);
    assert_eq!(
        payload.details(),
        Some(&json!({"userId": user_id.to_string()}))
    );
}

#[rstest]
#[case(Error::invalid_request("bad"))]
#[case(Error::not_found("missing"))]
#[case(Error::conflict("taken"))]
fn client_errors_carry_no_retry_hint(#[case] error: Error) {
    let response = ResponseError::error_response(&error);
    assert!(
        response
            .headers()
            .get(actix_web::http::header::RETRY_AFTER)
            .is_none()
    );
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}
