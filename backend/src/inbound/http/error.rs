//! Domain errors rendered as JSON HTTP responses.
//!
//! Status mapping follows the assistance error taxonomy: missing users and
//! meetings are `404`, unclaimable services and taken emails are `409`, and
//! storage failures are a retryable `503` carrying a `Retry-After` hint.
//! Internal failures are logged in full and reach the client redacted.

use actix_web::http::header::{CACHE_CONTROL, RETRY_AFTER};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Seconds a client should wait before retrying after a storage failure.
pub const RETRY_AFTER_SECS: u32 = 1;

const REDACTED_MESSAGE: &str = "Internal server error";

fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The body a client may see. Internal errors keep only their trace id.
fn public_body(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => {
            let redacted = Error::internal(REDACTED_MESSAGE);
            match error.trace_id() {
                Some(id) => redacted.with_trace_id(id),
                None => redacted,
            }
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self.code() {
            ErrorCode::InternalError => error!(
                trace_id = self.trace_id(),
                message = self.message(),
                "request failed with internal error"
            ),
            ErrorCode::ServiceUnavailable => warn!(
                trace_id = self.trace_id(),
                details = ?self.details(),
                "storage unavailable while serving request"
            ),
            _ => {}
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id));
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder
                .insert_header((RETRY_AFTER, RETRY_AFTER_SECS))
                .insert_header((CACHE_CONTROL, "no-store"));
        }
        builder.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
