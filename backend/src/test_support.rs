//! Test utilities for the neighborguard crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Only compiled for tests or with the `test-support` feature.

pub mod clock {
    //! Controllable clock implementing [`mockable::Clock`].

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.lock_clock() = now;
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod users {
    //! Builder producing valid users with sensible defaults.

    use std::collections::BTreeMap;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::{
        Address, ContactDetails, Coordinate, EmailAddress, Role, ServiceName, ServiceStatus,
        User, UserDraft, UserId,
    };

    /// Fixed instant used when a test does not care about time.
    pub fn epoch() -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single() {
            Some(value) => value,
            None => panic!("valid fixture timestamp"),
        }
    }

    #[derive(Debug, Clone)]
    pub struct UserBuilder {
        id: UserId,
        role: Role,
        first_name: String,
        email: Option<String>,
        languages: Vec<String>,
        services: BTreeMap<ServiceName, ServiceStatus>,
        location: Coordinate,
        last_ok: DateTime<Utc>,
    }

    impl UserBuilder {
        fn with_role(role: Role) -> Self {
            Self {
                id: UserId::random(),
                role,
                first_name: "Test".into(),
                email: None,
                languages: vec!["en".into()],
                services: BTreeMap::new(),
                location: Coordinate::new(32.0853, 34.7818),
                last_ok: epoch(),
            }
        }

        pub fn recipient() -> Self {
            Self::with_role(Role::Recipient)
        }

        pub fn volunteer() -> Self {
            Self::with_role(Role::Volunteer)
        }

        pub fn id(mut self, id: UserId) -> Self {
            self.id = id;
            self
        }

        pub fn first_name(mut self, name: &str) -> Self {
            self.first_name = name.to_owned();
            self
        }

        pub fn email(mut self, email: &str) -> Self {
            self.email = Some(email.to_owned());
            self
        }

        pub fn languages(mut self, languages: &[&str]) -> Self {
            self.languages = languages.iter().map(|l| (*l).to_owned()).collect();
            self
        }

        pub fn service(mut self, name: &str, status: ServiceStatus) -> Self {
            let name = match ServiceName::new(name) {
                Ok(name) => name,
                Err(err) => panic!("invalid fixture service name {name:?}: {err}"),
            };
            self.services.insert(name, status);
            self
        }

        pub fn location(mut self, location: Coordinate) -> Self {
            self.location = location;
            self
        }

        pub fn last_ok(mut self, last_ok: DateTime<Utc>) -> Self {
            self.last_ok = last_ok;
            self
        }

        pub fn build(self) -> User {
            let email = self
                .email
                .unwrap_or_else(|| format!("{}@example.org", self.id));
            let email = match EmailAddress::new(&email) {
                Ok(email) => email,
                Err(err) => panic!("invalid fixture email {email:?}: {err}"),
            };
            let draft = UserDraft {
                id: self.id,
                role: self.role,
                contact: ContactDetails {
                    first_name: self.first_name,
                    last_name: "User".into(),
                    age: 70,
                    phone_number: "050-0000000".into(),
                    gender: None,
                    email,
                    address: Address::default(),
                    profile_image: None,
                },
                languages: self.languages,
                services: self.services,
                location: self.location,
                last_ok: self.last_ok,
                created_at: epoch(),
                updated_at: epoch(),
            };
            match User::new(draft) {
                Ok(user) => user,
                Err(err) => panic!("invalid fixture user: {err}"),
            }
        }
    }
}

pub mod observer {
    //! Observer that keeps every event for later assertions.

    use std::sync::Mutex;

    use crate::domain::{AssistanceEvent, AssistanceObserver};

    #[derive(Debug, Default)]
    pub struct RecordingObserver(Mutex<Vec<AssistanceEvent>>);

    impl RecordingObserver {
        pub fn events(&self) -> Vec<AssistanceEvent> {
            match self.0.lock() {
                Ok(events) => events.clone(),
                Err(_) => panic!("observer mutex"),
            }
        }
    }

    impl AssistanceObserver for RecordingObserver {
        fn record(&self, event: AssistanceEvent) {
            match self.0.lock() {
                Ok(mut events) => events.push(event),
                Err(_) => panic!("observer mutex"),
            }
        }
    }
}
