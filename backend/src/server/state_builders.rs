//! Builders for HTTP state over the in-process document store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use neighborguard::domain::{AssistanceContext, TracingObserver};
use neighborguard::inbound::http::state::HttpState;
use neighborguard::outbound::persistence::{InMemoryMeetingRepository, InMemoryUserRepository};

use super::ServerConfig;

/// Build the shared context handed to every domain service.
fn build_context(config: &ServerConfig) -> AssistanceContext {
    AssistanceContext::new(Arc::new(DefaultClock), Arc::new(TracingObserver))
        .with_staleness(config.staleness)
        .with_deadline(config.deadline)
}

/// Build the shared HTTP state with empty in-memory repositories.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(HttpState::from_repositories(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryMeetingRepository::new()),
        build_context(config),
    ))
}
