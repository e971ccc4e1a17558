//! Users API handlers.
//!
//! ```text
//! GET  /api/v1/users?email=&role=&filterByLat=&filterByLon=&isRequiredAssistance=
//! POST /api/v1/users
//! GET  /api/v1/users/recipients?volunteerId=&filterByLat=&filterByLon=
//! GET  /api/v1/users/email/{email}
//! GET  /api/v1/users/{id}
//! PUT  /api/v1/users/{id}
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{NearbyRecipientsRequest, NewUser, UserListFilter, UserUpdate};
use crate::domain::{
    Address, ContactDetails, Coordinate, Error, Gender, RankedCandidate, ServiceName,
    ServiceStatus, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RankedCandidateSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, check_coordinate, invalid_value_error, parse_bool, parse_centre, parse_email,
    parse_optional_rfc3339_timestamp, parse_role, parse_service_name, parse_service_status,
    parse_user_id, require,
};

const FILTER_LAT: FieldName = FieldName::new("filterByLat");
const FILTER_LON: FieldName = FieldName::new("filterByLon");

/// Postal address as sent by clients. Missing parts default to empty/zero.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBody {
    pub city: String,
    pub street: String,
    pub house_number: u32,
    pub apartment_number: u32,
}

impl From<AddressBody> for Address {
    fn from(value: AddressBody) -> Self {
        Self {
            city: value.city,
            street: value.street,
            house_number: value.house_number,
            apartment_number: value.apartment_number,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct LocationBody {
    pub latitude: f64,
    pub longitude: f64,
}

/// Contact fields shared by the create and update payloads.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub phone_number: Option<String>,
    /// `MALE` or `FEMALE`.
    pub gender: Option<String>,
    pub email: Option<String>,
    pub address: Option<AddressBody>,
    pub profile_image: Option<String>,
}

impl ContactBody {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.age.is_none()
            && self.phone_number.is_none()
            && self.gender.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.profile_image.is_none()
    }

    /// Build full contact details; `firstName` and `email` are required.
    fn into_contact(self) -> Result<ContactDetails, Error> {
        let first_name = require(self.first_name, FieldName::new("firstName"))?;
        let email = require(self.email, FieldName::new("email"))?;
        Ok(ContactDetails {
            first_name,
            last_name: self.last_name.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            gender: self.gender.as_deref().map(parse_gender).transpose()?,
            email: parse_email(&email, FieldName::new("email"))?,
            address: self.address.map(Address::from).unwrap_or_default(),
            profile_image: self.profile_image,
        })
    }
}

fn parse_gender(value: &str) -> Result<Gender, Error> {
    match value {
        "MALE" => Ok(Gender::Male),
        "FEMALE" => Ok(Gender::Female),
        other => Err(invalid_value_error(
            FieldName::new("gender"),
            other,
            "expected MALE or FEMALE",
        )),
    }
}

fn parse_services(
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<ServiceName, ServiceStatus>, Error> {
    let field = FieldName::new("services");
    raw.into_iter()
        .map(|(name, status)| {
            Ok((
                parse_service_name(&name, field)?,
                parse_service_status(&status, field)?,
            ))
        })
        .collect()
}

fn parse_location(location: LocationBody) -> Result<Coordinate, Error> {
    check_coordinate(
        location.latitude,
        location.longitude,
        FieldName::new("location"),
    )
}

/// Registration body for `POST /api/v1/users`.
///
/// Example JSON:
/// `{"role":"RECIPIENT","firstName":"Dana","email":"dana@example.org",
/// "languages":["he"],"services":{"Cooking":"NEED_ASSISTANCE"},
/// "location":{"latitude":32.08,"longitude":34.78}}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// `VOLUNTEER` or `RECIPIENT`.
    pub role: Option<String>,
    #[serde(flatten)]
    pub contact: ContactBody,
    pub languages: Option<Vec<String>>,
    /// Service name to status, e.g. `{"Cooking": "NEED_ASSISTANCE"}`.
    pub services: Option<BTreeMap<String, String>>,
    pub location: Option<LocationBody>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let role = require(value.role, FieldName::new("role"))?;
        let location = require(value.location, FieldName::new("location"))?;
        Ok(Self {
            role: parse_role(&role, FieldName::new("role"))?,
            contact: value.contact.into_contact()?,
            languages: value.languages.unwrap_or_default(),
            services: parse_services(value.services.unwrap_or_default())?,
            location: parse_location(location)?,
        })
    }
}

/// Update body for `PUT /api/v1/users/{id}`.
///
/// Contact fields replace the stored contact details as a whole, so when any
/// is supplied `firstName` and `email` must be too. The role cannot change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub contact: ContactBody,
    pub languages: Option<Vec<String>>,
    pub services: Option<BTreeMap<String, String>>,
    pub location: Option<LocationBody>,
    /// RFC 3339 timestamp of the last "I'm OK" check-in.
    #[serde(rename = "lastOK")]
    pub last_ok: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        let contact = if value.contact.is_empty() {
            None
        } else {
            Some(value.contact.into_contact()?)
        };
        Ok(Self {
            contact,
            languages: value.languages,
            services: value.services.map(parse_services).transpose()?,
            location: value.location.map(parse_location).transpose()?,
            last_ok: parse_optional_rfc3339_timestamp(
                value.last_ok.as_deref(),
                FieldName::new("lastOK"),
            )?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    pub email: Option<String>,
    /// `VOLUNTEER` or `RECIPIENT`.
    pub role: Option<String>,
    pub filter_by_lat: Option<String>,
    pub filter_by_lon: Option<String>,
    /// `true` keeps users with any service needing assistance.
    pub is_required_assistance: Option<String>,
}

impl TryFrom<ListUsersParams> for UserListFilter {
    type Error = Error;

    fn try_from(value: ListUsersParams) -> Result<Self, Self::Error> {
        Ok(Self {
            email: value
                .email
                .as_deref()
                .map(|raw| parse_email(raw, FieldName::new("email")))
                .transpose()?,
            role: value
                .role
                .as_deref()
                .map(|raw| parse_role(raw, FieldName::new("role")))
                .transpose()?,
            centre: parse_centre(
                value.filter_by_lat.as_deref(),
                value.filter_by_lon.as_deref(),
                (FILTER_LAT, FILTER_LON),
            )?,
            requires_assistance: value
                .is_required_assistance
                .as_deref()
                .map(|raw| parse_bool(raw, FieldName::new("isRequiredAssistance")))
                .transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NearbyRecipientsParams {
    pub volunteer_id: Option<String>,
    pub filter_by_lat: Option<String>,
    pub filter_by_lon: Option<String>,
}

impl TryFrom<NearbyRecipientsParams> for NearbyRecipientsRequest {
    type Error = Error;

    fn try_from(value: NearbyRecipientsParams) -> Result<Self, Self::Error> {
        let field = FieldName::new("volunteerId");
        let raw = require(value.volunteer_id, field)?;
        Ok(Self {
            volunteer_id: parse_user_id(&raw, field)?,
            centre: parse_centre(
                value.filter_by_lat.as_deref(),
                value.filter_by_lon.as_deref(),
                (FILTER_LAT, FILTER_LON),
            )?,
        })
    }
}

/// One ranked recipient with the services the volunteer can cover.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidateResponse {
    pub recipient: User,
    pub matched_services: Vec<ServiceName>,
}

impl From<RankedCandidate> for RankedCandidateResponse {
    fn from(value: RankedCandidate) -> Self {
        Self {
            recipient: value.recipient,
            matched_services: value.matched_services,
        }
    }
}

/// List users matching the query filters.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListUsersParams>,
) -> ApiResult<web::Json<Vec<User>>> {
    let filter = UserListFilter::try_from(params.into_inner())?;
    Ok(web::Json(state.users.list_users(filter).await?))
}

/// Register a volunteer or recipient.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = NewUser::try_from(payload.into_inner())?;
    let user = state.user_commands.create_user(request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Recipients a volunteer can help, highest priority first.
///
/// Stale recipients are escalated to need a General Check as a side effect.
#[utoipa::path(
    get,
    path = "/api/v1/users/recipients",
    params(NearbyRecipientsParams),
    responses(
        (status = 200, description = "Ranked recipients", body = [RankedCandidateSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Volunteer not found", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "findNearbyRecipients"
)]
#[get("/users/recipients")]
pub async fn nearby_recipients(
    state: web::Data<HttpState>,
    params: web::Query<NearbyRecipientsParams>,
) -> ApiResult<web::Json<Vec<RankedCandidateResponse>>> {
    let request = NearbyRecipientsRequest::try_from(params.into_inner())?;
    let ranked = state.matching.find_nearby_recipients(request).await?;
    Ok(web::Json(
        ranked.into_iter().map(RankedCandidateResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/email/{email}",
    params(("email" = String, Path, description = "Registered email address")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail"
)]
#[get("/users/email/{email}")]
pub async fn get_user_by_email(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let email = parse_email(&path.into_inner(), FieldName::new("email"))?;
    Ok(web::Json(state.users.get_user_by_email(&email).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.users.get_user(&id).await?))
}

/// Update profile fields and service statuses.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner(), FieldName::new("id"))?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    Ok(web::Json(state.user_commands.update_user(id, update).await?))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
