//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query strings and bodies carry identifiers, statuses and coordinates as
//! strings so that malformed values produce the structured error body below
//! instead of Actix's plain-text extractor failure.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{
    Coordinate, EmailAddress, Error, MeetingId, MeetingStatus, Role, ServiceName, ServiceStatus,
    UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidCoordinate,
    IncompleteCoordinate,
    InvalidEnum,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidCoordinate => "invalid_coordinate",
            ErrorCode::IncompleteCoordinate => "incomplete_coordinate",
            ErrorCode::InvalidEnum => "invalid_enum",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_value_error(
    field: FieldName,
    value: &str,
    reason: impl std::fmt::Display,
) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("invalid {field}: {reason}"))
        .with_value(ErrorCode::InvalidValue, value)
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

fn invalid_enum_error(field: FieldName, value: &str, allowed: &[&str]) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be one of {}", allowed.join(", ")),
    )
    .with_value(ErrorCode::InvalidEnum, value)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_optional_user_id(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<UserId>, Error> {
    value.map(|raw| parse_user_id(raw, field)).transpose()
}

pub(crate) fn parse_meeting_id(value: &str, field: FieldName) -> Result<MeetingId, Error> {
    MeetingId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            ValidationError::new(name, format!("{name} must be an RFC 3339 timestamp"))
                .with_value(ErrorCode::InvalidTimestamp, value)
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(value).map_err(|err| invalid_value_error(field, value, err))
}

pub(crate) fn parse_service_name(value: &str, field: FieldName) -> Result<ServiceName, Error> {
    ServiceName::new(value).map_err(|err| invalid_value_error(field, value, err))
}

pub(crate) fn parse_role(value: &str, field: FieldName) -> Result<Role, Error> {
    Role::from_str(value).map_err(|_| invalid_enum_error(field, value, &["VOLUNTEER", "RECIPIENT"]))
}

pub(crate) fn parse_meeting_status(value: &str, field: FieldName) -> Result<MeetingStatus, Error> {
    MeetingStatus::from_str(value)
        .map_err(|_| invalid_enum_error(field, value, &["IN_PROGRESS", "DONE"]))
}

pub(crate) fn parse_service_status(value: &str, field: FieldName) -> Result<ServiceStatus, Error> {
    ServiceStatus::from_str(value).map_err(|_| {
        invalid_enum_error(
            field,
            value,
            &[
                "DO_NOT_NEED_ASSISTANCE",
                "NEED_ASSISTANCE",
                "IN_PROGRESS",
                "PROVIDE",
                "DO_NOT_PROVIDE",
            ],
        )
    })
}

pub(crate) fn parse_bool(value: &str, field: FieldName) -> Result<bool, Error> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(invalid_enum_error(field, other, &["true", "false"])),
    }
}

fn parse_degrees(value: &str, field: FieldName, limit: f64) -> Result<f64, Error> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|degrees| degrees.is_finite() && degrees.abs() <= limit)
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(
                name,
                format!("{name} must be a number between -{limit} and {limit}"),
            )
            .with_value(ErrorCode::InvalidCoordinate, value)
        })
}

/// Validate a coordinate supplied as JSON numbers.
pub(crate) fn check_coordinate(
    latitude: f64,
    longitude: f64,
    field: FieldName,
) -> Result<Coordinate, Error> {
    let in_range = latitude.is_finite()
        && longitude.is_finite()
        && latitude.abs() <= 90.0
        && longitude.abs() <= 180.0;
    if in_range {
        Ok(Coordinate::new(latitude, longitude))
    } else {
        let name = field.as_str();
        Err(ValidationError::new(
            name,
            format!("{name} must have latitude within 90 and longitude within 180 degrees"),
        )
        .with_value(ErrorCode::InvalidCoordinate, format!("{latitude},{longitude}")))
    }
}

/// Parse an optional latitude/longitude pair; supplying only one is an error.
pub(crate) fn parse_centre(
    latitude: Option<&str>,
    longitude: Option<&str>,
    fields: (FieldName, FieldName),
) -> Result<Option<Coordinate>, Error> {
    let (lat_field, lon_field) = fields;
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => Ok(Some(Coordinate::new(
            parse_degrees(lat, lat_field, 90.0)?,
            parse_degrees(lon, lon_field, 180.0)?,
        ))),
        (Some(_), None) | (None, Some(_)) => {
            let (lat, lon) = (lat_field.as_str(), lon_field.as_str());
            Err(
                ValidationError::new(lat, format!("{lat} and {lon} must be supplied together"))
                    .with_code(ErrorCode::IncompleteCoordinate),
            )
        }
    }
}
