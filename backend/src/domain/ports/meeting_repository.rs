//! Port for meeting persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Meeting, MeetingId, MeetingStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by meeting repository adapters.
    pub enum MeetingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "meeting repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "meeting repository query failed: {message}",
        /// A meeting with the same id already exists.
        Duplicate { message: String } =>
            "meeting repository duplicate key: {message}",
    }
}

/// Store-side selection of meetings.
///
/// `user_id` matches either participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingFilter {
    pub user_id: Option<UserId>,
    pub status: Option<MeetingStatus>,
}

impl MeetingFilter {
    /// Whether `meeting` passes every set criterion.
    pub fn matches(&self, meeting: &Meeting) -> bool {
        self.user_id.as_ref().is_none_or(|id| meeting.involves(id))
            && self.status.is_none_or(|status| meeting.status() == status)
    }
}

/// Partial update applied by [`MeetingRepository::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingPatch {
    pub status: MeetingStatus,
    pub updated_at: DateTime<Utc>,
}

impl MeetingPatch {
    pub(crate) fn apply_to(&self, meeting: &mut Meeting) {
        meeting.set_status(self.status, self.updated_at);
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn get(&self, id: &MeetingId) -> Result<Option<Meeting>, MeetingRepositoryError>;

    /// List meetings matching `query`, oldest first.
    async fn query(&self, query: &MeetingFilter) -> Result<Vec<Meeting>, MeetingRepositoryError>;

    async fn insert(&self, meeting: &Meeting) -> Result<(), MeetingRepositoryError>;

    /// Remove a meeting; fails with `Query` when absent.
    async fn delete(&self, id: &MeetingId) -> Result<(), MeetingRepositoryError>;

    /// Apply `patch`; fails with `Query` when absent.
    async fn update(
        &self,
        id: &MeetingId,
        patch: &MeetingPatch,
    ) -> Result<(), MeetingRepositoryError>;
}
