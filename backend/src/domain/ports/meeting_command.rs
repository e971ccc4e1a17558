//! Driving port for meeting mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, MeetingDetails, MeetingId, MeetingStatus, ServiceName, UserId};

/// Request to schedule a meeting and claim the listed services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMeetingRequest {
    pub recipient_id: UserId,
    pub volunteer_id: UserId,
    pub services: Vec<ServiceName>,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelMeetingRequest {
    pub meeting_id: MeetingId,
    pub acting_user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateMeetingStatusRequest {
    pub meeting_id: MeetingId,
    pub status: MeetingStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingCommand: Send + Sync {
    /// Claim the requested services and persist the meeting.
    ///
    /// Services that cannot be claimed are dropped from the meeting; the
    /// call fails only when none can be claimed.
    async fn create_meeting(&self, request: CreateMeetingRequest) -> Result<MeetingDetails, Error>;

    async fn cancel_meeting(&self, request: CancelMeetingRequest) -> Result<(), Error>;

    async fn update_meeting_status(
        &self,
        request: UpdateMeetingStatusRequest,
    ) -> Result<MeetingDetails, Error>;
}
