//! Meeting coordinator.
//!
//! The coordinator is the only writer of meetings and the only caller of
//! the claim and release transitions. Every read-modify-write of a
//! recipient's services happens while both participants are locked through
//! the shared [`RecipientLocks`](crate::domain::RecipientLocks), so two
//! concurrent creates for the same service cannot both claim it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    CancelMeetingRequest, CreateMeetingRequest, MeetingCommand, MeetingFilter, MeetingPatch,
    MeetingQuery, MeetingRepository, UpdateMeetingStatusRequest, UserPatch, UserRepository,
};
use crate::domain::service_state::{self, ServiceTransitionError};
use crate::domain::{
    AssistanceContext, AssistanceError, AssistanceEvent, Error, Meeting, MeetingDetails,
    MeetingDraft, MeetingId, MeetingStatus, Role, ServiceName, User, UserId,
};

/// Orchestrates meeting creation, cancellation and status changes.
#[derive(Clone)]
pub struct MeetingCoordinator<U, M> {
    users: Arc<U>,
    meetings: Arc<M>,
    context: AssistanceContext,
}

impl<U, M> MeetingCoordinator<U, M> {
    /// Build a coordinator over the user and meeting stores.
    pub fn new(users: Arc<U>, meetings: Arc<M>, context: AssistanceContext) -> Self {
        Self {
            users,
            meetings,
            context,
        }
    }
}

fn dedup_in_order(services: Vec<ServiceName>) -> Vec<ServiceName> {
    let mut unique: Vec<ServiceName> = Vec::with_capacity(services.len());
    for service in services {
        if !unique.contains(&service) {
            unique.push(service);
        }
    }
    unique
}

fn require_role(user: &User, role: Role, field: &str) -> Result<(), AssistanceError> {
    if user.role() == role {
        Ok(())
    } else {
        Err(AssistanceError::invalid_input(
            field,
            format!("user {} is not a {role}", user.id()),
        ))
    }
}

impl<U, M> MeetingCoordinator<U, M>
where
    U: UserRepository,
    M: MeetingRepository,
{
    async fn load_user(&self, id: &UserId) -> Result<Option<User>, AssistanceError> {
        self.context
            .deadline
            .run("users.get", self.users.get(id))
            .await
    }

    async fn load_meeting(&self, id: MeetingId) -> Result<Meeting, AssistanceError> {
        self.context
            .deadline
            .run("meetings.get", self.meetings.get(&id))
            .await?
            .ok_or(AssistanceError::MeetingNotFound { meeting_id: id })
    }

    async fn persist_services(&self, recipient: &mut User) -> Result<(), AssistanceError> {
        let patch = UserPatch::services_of(recipient, self.context.clock.utc());
        self.context
            .deadline
            .run("users.update", self.users.update(recipient.id(), &patch))
            .await?;
        patch.apply_to(recipient);
        Ok(())
    }

    /// Claim every claimable requested service and persist the meeting.
    ///
    /// Unclaimable services are dropped and reported to the observer; the
    /// meeting lists only what was claimed. Fails with `AlreadyInProgress`
    /// when nothing could be claimed, leaving all state untouched.
    pub async fn create_meeting(
        &self,
        request: CreateMeetingRequest,
    ) -> Result<MeetingDetails, AssistanceError> {
        let CreateMeetingRequest {
            recipient_id,
            volunteer_id,
            services,
            scheduled_at,
        } = request;
        let requested = dedup_in_order(services);
        if requested.is_empty() {
            return Err(AssistanceError::invalid_input(
                "services",
                "at least one service must be requested",
            ));
        }
        if recipient_id == volunteer_id {
            return Err(AssistanceError::invalid_input(
                "volunteerId",
                "recipient and volunteer must be different users",
            ));
        }

        let _guards = self
            .context
            .locks
            .lock_all([&recipient_id, &volunteer_id])
            .await;

        let mut recipient = self
            .load_user(&recipient_id)
            .await?
            .ok_or_else(|| AssistanceError::RecipientNotFound {
                recipient_id: recipient_id.clone(),
            })?;
        let volunteer = self
            .load_user(&volunteer_id)
            .await?
            .ok_or_else(|| AssistanceError::VolunteerNotFound {
                volunteer_id: volunteer_id.clone(),
            })?;
        require_role(&recipient, Role::Recipient, "recipientId")?;
        require_role(&volunteer, Role::Volunteer, "volunteerId")?;

        let (claimed, dropped) = self.claim_services(&mut recipient, &requested);
        if claimed.is_empty() {
            return Err(AssistanceError::AlreadyInProgress {
                recipient_id,
                services: requested,
            });
        }

        let now = self.context.clock.utc();
        let meeting = Meeting::new(MeetingDraft {
            id: MeetingId::random(),
            recipient_id: recipient_id.clone(),
            volunteer_id: volunteer_id.clone(),
            scheduled_at,
            services: claimed,
            now,
        })
        .map_err(|err| AssistanceError::invalid_input("meeting", err.to_string()))?;

        self.persist_services(&mut recipient).await?;
        if let Err(err) = self
            .context
            .deadline
            .run("meetings.insert", self.meetings.insert(&meeting))
            .await
        {
            self.compensate(&mut recipient, meeting.services(), &err)
                .await;
            return Err(err);
        }

        self.context.observer.record(AssistanceEvent::MeetingCreated {
            meeting_id: meeting.id(),
            recipient_id,
            volunteer_id,
            dropped,
        });
        Ok(MeetingDetails {
            meeting,
            recipient: Some(recipient),
            volunteer: Some(volunteer),
            partial_data_warning: false,
        })
    }

    fn claim_services(
        &self,
        recipient: &mut User,
        requested: &[ServiceName],
    ) -> (Vec<ServiceName>, Vec<ServiceName>) {
        let mut claimed = Vec::new();
        let mut dropped = Vec::new();
        for service in requested {
            match service_state::claim(recipient, service) {
                Ok(()) => {
                    self.context.observer.record(AssistanceEvent::ServiceClaimed {
                        recipient_id: recipient.id().clone(),
                        service: service.clone(),
                    });
                    claimed.push(service.clone());
                }
                Err(reason) => {
                    self.context.observer.record(AssistanceEvent::ServiceSkipped {
                        recipient_id: recipient.id().clone(),
                        service: service.clone(),
                        reason,
                    });
                    dropped.push(service.clone());
                }
            }
        }
        (claimed, dropped)
    }

    /// Undo claims after the meeting insert failed.
    async fn compensate(
        &self,
        recipient: &mut User,
        claimed: &[ServiceName],
        cause: &AssistanceError,
    ) {
        for service in claimed {
            if let Err(reason) = service_state::release(recipient, service) {
                self.report_skip(recipient.id(), service, reason);
            }
        }
        let restored = self.persist_services(recipient).await.is_ok();
        self.context
            .observer
            .record(AssistanceEvent::ClaimsCompensated {
                recipient_id: recipient.id().clone(),
                error: cause.clone(),
                restored,
            });
    }

    /// Delete a meeting. When the volunteer cancels, every listed service
    /// goes back to needed; services no longer in progress are skipped.
    pub async fn cancel_meeting(
        &self,
        meeting_id: MeetingId,
        acting_user_id: &UserId,
    ) -> Result<(), AssistanceError> {
        let meeting = self.load_meeting(meeting_id).await?;
        let acting = self
            .load_user(acting_user_id)
            .await?
            .ok_or_else(|| AssistanceError::UserNotFound {
                user_id: acting_user_id.clone(),
            })?;
        if !meeting.involves(acting.id()) {
            return Err(AssistanceError::invalid_input(
                "userId",
                format!("user {acting_user_id} is not part of meeting {meeting_id}"),
            ));
        }

        let _guards = self
            .context
            .locks
            .lock_all([meeting.recipient_id(), meeting.volunteer_id()])
            .await;
        // A concurrent cancel may have won while we waited.
        let meeting = self.load_meeting(meeting_id).await?;

        if acting.id() == meeting.volunteer_id() {
            self.release_services(&meeting).await?;
        }
        self.context
            .deadline
            .run("meetings.delete", self.meetings.delete(&meeting_id))
            .await?;

        self.context.observer.record(AssistanceEvent::MeetingCancelled {
            meeting_id,
            acting_user_id: acting_user_id.clone(),
        });
        Ok(())
    }

    async fn release_services(&self, meeting: &Meeting) -> Result<(), AssistanceError> {
        let recipient_id = meeting.recipient_id();
        let mut recipient =
            self.load_user(recipient_id)
                .await?
                .ok_or_else(|| AssistanceError::RecipientNotFound {
                    recipient_id: recipient_id.clone(),
                })?;

        let mut released = false;
        for service in meeting.services() {
            let event = match service_state::release(&mut recipient, service) {
                Ok(()) => {
                    released = true;
                    AssistanceEvent::ServiceReleased {
                        recipient_id: recipient_id.clone(),
                        service: service.clone(),
                    }
                }
                Err(reason) => AssistanceEvent::ServiceSkipped {
                    recipient_id: recipient_id.clone(),
                    service: service.clone(),
                    reason,
                },
            };
            self.context.observer.record(event);
        }
        if released {
            self.persist_services(&mut recipient).await?;
        }
        Ok(())
    }

    /// Set the meeting status. Service statuses are left as they are.
    pub async fn update_status(
        &self,
        meeting_id: MeetingId,
        status: MeetingStatus,
    ) -> Result<MeetingDetails, AssistanceError> {
        let meeting = self.load_meeting(meeting_id).await?;
        let _guards = self
            .context
            .locks
            .lock_all([meeting.recipient_id(), meeting.volunteer_id()])
            .await;
        // Cancellation holds the same locks, so the meeting may be gone now.
        let mut meeting = self.load_meeting(meeting_id).await?;
        let patch = MeetingPatch {
            status,
            updated_at: self.context.clock.utc(),
        };
        self.context
            .deadline
            .run("meetings.update", self.meetings.update(&meeting_id, &patch))
            .await?;
        patch.apply_to(&mut meeting);
        self.context
            .observer
            .record(AssistanceEvent::MeetingStatusChanged { meeting_id });

        let details = self.populate(meeting).await;
        if let (MeetingStatus::Done, Some(recipient)) = (status, &details.recipient) {
            for service in details.meeting.services() {
                if let Err(reason) = service_state::complete(recipient, service) {
                    self.report_skip(recipient.id(), service, reason);
                }
            }
        }
        Ok(details)
    }

    fn report_skip(
        &self,
        recipient_id: &UserId,
        service: &ServiceName,
        reason: ServiceTransitionError,
    ) {
        self.context.observer.record(AssistanceEvent::ServiceSkipped {
            recipient_id: recipient_id.clone(),
            service: service.clone(),
            reason,
        });
    }

    /// Meetings matching `filter`, oldest first, with current participants.
    pub async fn list_meetings(
        &self,
        filter: &MeetingFilter,
    ) -> Result<Vec<MeetingDetails>, AssistanceError> {
        let meetings = self
            .context
            .deadline
            .run("meetings.query", self.meetings.query(filter))
            .await?;
        let mut details = Vec::with_capacity(meetings.len());
        for meeting in meetings {
            details.push(self.populate(meeting).await);
        }
        Ok(details)
    }

    /// Resolve both participants; failed lookups degrade to a warning.
    async fn populate(&self, meeting: Meeting) -> MeetingDetails {
        let recipient = self.participant(meeting.id(), meeting.recipient_id()).await;
        let volunteer = self.participant(meeting.id(), meeting.volunteer_id()).await;
        MeetingDetails {
            partial_data_warning: recipient.is_none() || volunteer.is_none(),
            meeting,
            recipient,
            volunteer,
        }
    }

    async fn participant(&self, meeting_id: MeetingId, user_id: &UserId) -> Option<User> {
        let error = match self.load_user(user_id).await {
            Ok(Some(user)) => return Some(user),
            Ok(None) => AssistanceError::UserNotFound {
                user_id: user_id.clone(),
            },
            Err(err) => err,
        };
        self.context
            .observer
            .record(AssistanceEvent::PartialData { meeting_id, error });
        None
    }
}

#[async_trait]
impl<U, M> MeetingCommand for MeetingCoordinator<U, M>
where
    U: UserRepository,
    M: MeetingRepository,
{
    async fn create_meeting(&self, request: CreateMeetingRequest) -> Result<MeetingDetails, Error> {
        MeetingCoordinator::create_meeting(self, request)
            .await
            .map_err(Error::from)
    }

    async fn cancel_meeting(&self, request: CancelMeetingRequest) -> Result<(), Error> {
        MeetingCoordinator::cancel_meeting(self, request.meeting_id, &request.acting_user_id)
            .await
            .map_err(Error::from)
    }

    async fn update_meeting_status(
        &self,
        request: UpdateMeetingStatusRequest,
    ) -> Result<MeetingDetails, Error> {
        self.update_status(request.meeting_id, request.status)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<U, M> MeetingQuery for MeetingCoordinator<U, M>
where
    U: UserRepository,
    M: MeetingRepository,
{
    async fn list_meetings(&self, filter: MeetingFilter) -> Result<Vec<MeetingDetails>, Error> {
        MeetingCoordinator::list_meetings(self, &filter)
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "meeting_service_tests.rs"]
mod tests;
