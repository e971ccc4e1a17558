//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    MeetingCommand, MeetingQuery, MeetingRepository, RecipientMatchingQuery, UserCommand,
    UserRepository, UsersQuery,
};
use crate::domain::{AssistanceContext, MeetingCoordinator, RecipientMatchingService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub user_commands: Arc<dyn UserCommand>,
    pub matching: Arc<dyn RecipientMatchingQuery>,
    pub meetings: Arc<dyn MeetingCommand>,
    pub meetings_query: Arc<dyn MeetingQuery>,
}

impl HttpState {
    /// Wire the domain services over the given repositories.
    ///
    /// Every service shares `context`, so they serialise on the same
    /// per-user locks.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use neighborguard::domain::AssistanceContext;
    /// use neighborguard::inbound::http::state::HttpState;
    /// use neighborguard::outbound::persistence::{
    ///     InMemoryMeetingRepository, InMemoryUserRepository,
    /// };
    ///
    /// let state = HttpState::from_repositories(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(InMemoryMeetingRepository::new()),
    ///     AssistanceContext::default(),
    /// );
    /// let _users = state.users.clone();
    /// ```
    pub fn from_repositories<U, M>(
        users: Arc<U>,
        meetings: Arc<M>,
        context: AssistanceContext,
    ) -> Self
    where
        U: UserRepository + 'static,
        M: MeetingRepository + 'static,
    {
        let user_service = Arc::new(UserService::new(users.clone(), context.clone()));
        let coordinator = Arc::new(MeetingCoordinator::new(
            users.clone(),
            meetings,
            context.clone(),
        ));
        Self {
            users: user_service.clone(),
            user_commands: user_service,
            matching: Arc::new(RecipientMatchingService::new(users, context)),
            meetings: coordinator.clone(),
            meetings_query: coordinator,
        }
    }
}
