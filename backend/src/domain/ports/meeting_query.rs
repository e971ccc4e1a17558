//! Driving port for meeting listings.

use async_trait::async_trait;

use crate::domain::{Error, MeetingDetails};

use super::MeetingFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingQuery: Send + Sync {
    /// Meetings matching `filter`, with participants resolved at read time.
    async fn list_meetings(&self, filter: MeetingFilter) -> Result<Vec<MeetingDetails>, Error>;
}
