//! Tests for the domain user model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn service(name: &str) -> ServiceName {
    ServiceName::new(name).expect("valid service name")
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn contact() -> ContactDetails {
    ContactDetails {
        first_name: "Dana".into(),
        last_name: "Levi".into(),
        age: 78,
        phone_number: "+972-50-000-0000".into(),
        gender: Some(Gender::Female),
        email: EmailAddress::new("Dana@Example.org").expect("valid email"),
        address: Address {
            city: "Tel Aviv".into(),
            street: "Dizengoff".into(),
            house_number: 10,
            apartment_number: 3,
        },
        profile_image: None,
    }
}

fn draft(role: Role, contact: ContactDetails, now: DateTime<Utc>) -> UserDraft {
    UserDraft {
        id: UserId::new(VALID_ID).expect("valid id"),
        role,
        contact,
        languages: vec!["en".into(), " he ".into(), String::new()],
        services: BTreeMap::new(),
        location: Coordinate::new(32.08, 34.78),
        last_ok: now,
        created_at: now,
        updated_at: now,
    }
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn user_id_round_trips_through_display() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("@example.org", UserValidationError::InvalidEmail)]
#[case("a@b@c", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_addresses(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
fn email_is_lower_cased() {
    let email = EmailAddress::new("  Dana@Example.ORG ").expect("valid email");
    assert_eq!(email.as_ref(), "dana@example.org");
}

#[rstest]
fn recipients_always_carry_general_check(contact: ContactDetails, now: DateTime<Utc>) {
    let user = User::new(draft(Role::Recipient, contact, now)).expect("valid recipient");
    assert_eq!(
        user.service_status(&ServiceName::general_check()),
        Some(ServiceStatus::DoNotNeedAssistance)
    );
}

#[rstest]
fn existing_general_check_status_is_kept(contact: ContactDetails, now: DateTime<Utc>) {
    let mut input = draft(Role::Recipient, contact, now);
    input
        .services
        .insert(ServiceName::general_check(), ServiceStatus::NeedAssistance);
    let user = User::new(input).expect("valid recipient");
    assert_eq!(
        user.service_status(&ServiceName::general_check()),
        Some(ServiceStatus::NeedAssistance)
    );
}

#[rstest]
fn volunteers_do_not_get_general_check(contact: ContactDetails, now: DateTime<Utc>) {
    let user = User::new(draft(Role::Volunteer, contact, now)).expect("valid volunteer");
    assert!(user.services().is_empty());
}

#[rstest]
#[case(Role::Recipient, ServiceStatus::Provide)]
#[case(Role::Volunteer, ServiceStatus::NeedAssistance)]
fn statuses_must_match_role(
    contact: ContactDetails,
    now: DateTime<Utc>,
    #[case] role: Role,
    #[case] status: ServiceStatus,
) {
    let mut input = draft(role, contact, now);
    input.services.insert(service("Cooking"), status);
    let err = User::new(input).expect_err("status rejected");
    assert_eq!(
        err,
        UserValidationError::StatusNotAllowedForRole {
            service: service("Cooking"),
            status,
            role,
        }
    );
}

#[rstest]
fn blank_first_name_is_rejected(mut contact: ContactDetails, now: DateTime<Utc>) {
    contact.first_name = "  ".into();
    let err = User::new(draft(Role::Recipient, contact, now)).expect_err("blank name");
    assert_eq!(err, UserValidationError::EmptyFirstName);
}

#[rstest]
fn languages_are_trimmed_and_deduplicated(contact: ContactDetails, now: DateTime<Utc>) {
    let user = User::new(draft(Role::Volunteer, contact, now)).expect("valid volunteer");
    let languages: Vec<_> = user.languages().iter().map(String::as_str).collect();
    assert_eq!(languages, vec!["en", "he"]);
}

#[rstest]
fn serialises_with_wire_field_names(contact: ContactDetails, now: DateTime<Utc>) {
    let user = User::new(draft(Role::Recipient, contact, now)).expect("valid recipient");
    let value = serde_json::to_value(&user).expect("user serialises");

    assert_eq!(value["id"], json!(VALID_ID));
    assert_eq!(value["role"], json!("RECIPIENT"));
    assert_eq!(value["firstName"], json!("Dana"));
    assert_eq!(value["email"], json!("dana@example.org"));
    assert_eq!(value["address"]["houseNumber"], json!(10));
    assert_eq!(
        value["services"]["General Check"],
        json!("DO_NOT_NEED_ASSISTANCE")
    );
    assert!(value.get("lastOK").is_some());
}

#[rstest]
fn deserialising_revalidates(contact: ContactDetails, now: DateTime<Utc>) {
    let user = User::new(draft(Role::Recipient, contact, now)).expect("valid recipient");
    let mut value = serde_json::to_value(&user).expect("user serialises");
    value["services"]["Cooking"] = json!("PROVIDE");

    let result: Result<User, _> = serde_json::from_value(value);
    assert!(result.is_err());
}

#[rstest]
fn shared_languages_intersect(contact: ContactDetails, now: DateTime<Utc>) {
    let recipient = User::new(draft(Role::Recipient, contact.clone(), now)).expect("recipient");
    let mut other = draft(Role::Volunteer, contact, now);
    other.languages = vec!["he".into(), "ru".into()];
    let volunteer = User::new(other).expect("volunteer");

    let shared: Vec<_> = recipient.shared_languages(&volunteer).collect();
    assert_eq!(shared, vec!["he"]);
}
