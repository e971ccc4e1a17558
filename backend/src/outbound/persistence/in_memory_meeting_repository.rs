//! In-memory `MeetingRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    MeetingFilter, MeetingPatch, MeetingRepository, MeetingRepositoryError,
};
use crate::domain::{Meeting, MeetingId};

#[derive(Debug, Default)]
pub struct InMemoryMeetingRepository {
    meetings: RwLock<HashMap<MeetingId, Meeting>>,
}

impl InMemoryMeetingRepository {
    /// Empty meeting store.
    pub fn new() -> Self {
        Self::default()
    }

    fn missing(id: &MeetingId) -> MeetingRepositoryError {
        MeetingRepositoryError::query(format!("meeting {id} does not exist"))
    }
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn get(&self, id: &MeetingId) -> Result<Option<Meeting>, MeetingRepositoryError> {
        Ok(self.meetings.read().await.get(id).cloned())
    }

    async fn query(&self, query: &MeetingFilter) -> Result<Vec<Meeting>, MeetingRepositoryError> {
        let meetings = self.meetings.read().await;
        let mut matched: Vec<Meeting> = meetings
            .values()
            .filter(|meeting| query.matches(meeting))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(matched)
    }

    async fn insert(&self, meeting: &Meeting) -> Result<(), MeetingRepositoryError> {
        let mut meetings = self.meetings.write().await;
        if meetings.contains_key(&meeting.id()) {
            return Err(MeetingRepositoryError::duplicate(format!(
                "meeting {}",
                meeting.id()
            )));
        }
        meetings.insert(meeting.id(), meeting.clone());
        Ok(())
    }

    async fn delete(&self, id: &MeetingId) -> Result<(), MeetingRepositoryError> {
        self.meetings
            .write()
            .await
            .remove(id)
            .map(drop)
            .ok_or_else(|| Self::missing(id))
    }

    async fn update(
        &self,
        id: &MeetingId,
        patch: &MeetingPatch,
    ) -> Result<(), MeetingRepositoryError> {
        let mut meetings = self.meetings.write().await;
        let meeting = meetings.get_mut(id).ok_or_else(|| Self::missing(id))?;
        patch.apply_to(meeting);
        Ok(())
    }
}
