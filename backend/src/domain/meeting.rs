//! Meetings between a volunteer and a recipient.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ServiceName, User, UserId};

/// Validation errors raised while building meetings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeetingValidationError {
    #[error("meeting id must be a valid UUID")]
    InvalidId,
    #[error("a meeting must address at least one service")]
    NoServices,
    #[error("recipient and volunteer must be different users")]
    SameParticipant,
    #[error("unknown meeting status: {0}")]
    UnknownStatus(String),
}

/// Stable meeting identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MeetingId(Uuid);

impl MeetingId {
    /// Parse a meeting id from its UUID text.
    pub fn new(id: impl AsRef<str>) -> Result<Self, MeetingValidationError> {
        let id = id.as_ref();
        if id.trim() != id {
            return Err(MeetingValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| MeetingValidationError::InvalidId)
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<MeetingId> for String {
    fn from(value: MeetingId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for MeetingId {
    type Error = MeetingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lifecycle of a meeting. Completion is tracked here, not on services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    #[serde(alias = "IS_PICKED")]
    InProgress,
    Done,
}

impl MeetingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingStatus {
    type Err = MeetingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" | "IS_PICKED" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            other => Err(MeetingValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Input payload for [`Meeting::new`].
#[derive(Debug, Clone)]
pub struct MeetingDraft {
    pub id: MeetingId,
    pub recipient_id: UserId,
    pub volunteer_id: UserId,
    pub scheduled_at: DateTime<Utc>,
    pub services: Vec<ServiceName>,
    pub now: DateTime<Utc>,
}

/// A scheduled visit covering one or more claimed services.
///
/// The service list is frozen at creation; only the status and the
/// update timestamp change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    id: MeetingId,
    recipient_id: UserId,
    volunteer_id: UserId,
    scheduled_at: DateTime<Utc>,
    services: Vec<ServiceName>,
    status: MeetingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Meeting {
    /// Build a new in-progress meeting.
    pub fn new(draft: MeetingDraft) -> Result<Self, MeetingValidationError> {
        if draft.services.is_empty() {
            return Err(MeetingValidationError::NoServices);
        }
        if draft.recipient_id == draft.volunteer_id {
            return Err(MeetingValidationError::SameParticipant);
        }
        Ok(Self {
            id: draft.id,
            recipient_id: draft.recipient_id,
            volunteer_id: draft.volunteer_id,
            scheduled_at: draft.scheduled_at,
            services: draft.services,
            status: MeetingStatus::InProgress,
            created_at: draft.now,
            updated_at: draft.now,
        })
    }

    /// Stable meeting identifier.
    pub fn id(&self) -> MeetingId {
        self.id
    }

    /// Recipient being assisted.
    pub fn recipient_id(&self) -> &UserId {
        &self.recipient_id
    }

    /// Volunteer providing the assistance.
    pub fn volunteer_id(&self) -> &UserId {
        &self.volunteer_id
    }

    /// Agreed meeting time.
    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    /// Services claimed for this meeting.
    pub fn services(&self) -> &[ServiceName] {
        &self.services
    }

    /// Current lifecycle status.
    pub fn status(&self) -> MeetingStatus {
        self.status
    }

    /// When the meeting was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the meeting last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user_id` is the recipient or the volunteer.
    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.recipient_id == user_id || &self.volunteer_id == user_id
    }

    pub(crate) fn set_status(&mut self, status: MeetingStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

/// A meeting with both participants resolved at read time.
///
/// `partial_data_warning` is set when a participant lookup failed after
/// the meeting itself was read or written; the missing side is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    pub meeting: Meeting,
    pub recipient: Option<User>,
    pub volunteer: Option<User>,
    pub partial_data_warning: bool,
}
