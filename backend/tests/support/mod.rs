//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`. This
//! module wires the full HTTP surface over the in-memory adapters with a
//! controllable clock so each test can seed users and drive requests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use neighborguard::Trace;
use neighborguard::domain::{AssistanceContext, NoopObserver, StalenessPolicy, User};
use neighborguard::inbound::http::meetings::{
    cancel_meeting, create_meeting, list_meetings, update_meeting_status,
};
use neighborguard::inbound::http::state::HttpState;
use neighborguard::inbound::http::users::{
    create_user, get_user, get_user_by_email, list_users, nearby_recipients, update_user,
};
use neighborguard::outbound::persistence::{InMemoryMeetingRepository, InMemoryUserRepository};
use neighborguard::test_support::clock::MutableClock;
use neighborguard::test_support::users::epoch;

/// Check-in threshold used across integration tests.
pub const STALENESS_SECS: u64 = 60;

/// Stores, clock and HTTP state for one test.
pub struct World {
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl World {
    /// Seed the user store; the clock starts at the fixture epoch.
    pub async fn seeded(users: impl IntoIterator<Item = User>) -> Self {
        let clock = Arc::new(MutableClock::new(epoch()));
        let users = InMemoryUserRepository::with_users(users)
            .await
            .expect("fixture users are unique");
        let context = AssistanceContext::new(clock.clone(), Arc::new(NoopObserver))
            .with_staleness(StalenessPolicy::from_secs(STALENESS_SECS));
        let state = HttpState::from_repositories(
            Arc::new(users),
            Arc::new(InMemoryMeetingRepository::new()),
            context,
        );
        Self { clock, state }
    }

    /// The `/api/v1` surface wrapped in the trace middleware.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(list_users)
                    .service(create_user)
                    .service(nearby_recipients)
                    .service(get_user_by_email)
                    .service(get_user)
                    .service(update_user)
                    .service(create_meeting)
                    .service(list_meetings)
                    .service(cancel_meeting)
                    .service(update_meeting_status),
            )
    }
}

/// Status and decoded JSON body; an empty body decodes to `Null`.
pub async fn json_body(response: ServiceResponse) -> (StatusCode, Value) {
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}
