//! Volunteer-facing recipient search.
//!
//! Loads every recipient, escalates stale ones, filters for eligibility and
//! ranks the result. Escalations are persisted, so this read path writes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    NearbyRecipientsRequest, RecipientMatchingQuery, UserFilter, UserPatch, UserRepository,
};
use crate::domain::{
    AssistanceContext, AssistanceError, AssistanceEvent, Coordinate, EligibilityFilter,
    EligibilityOutcome, Error, RankedCandidate, User, UserId, VerifiedVolunteer, rank, staleness,
};

#[derive(Clone)]
pub struct RecipientMatchingService<U> {
    users: Arc<U>,
    context: AssistanceContext,
}

impl<U> RecipientMatchingService<U> {
    /// Build the matching service over `users`.
    pub fn new(users: Arc<U>, context: AssistanceContext) -> Self {
        Self { users, context }
    }
}

impl<U> RecipientMatchingService<U>
where
    U: UserRepository,
{
    /// Eligible recipients for `volunteer_id`, highest priority first.
    pub async fn find_nearby_recipients(
        &self,
        volunteer_id: &UserId,
        centre: Option<Coordinate>,
    ) -> Result<Vec<RankedCandidate>, AssistanceError> {
        let deadline = self.context.deadline;
        let volunteer = deadline
            .run("users.get", self.users.get(volunteer_id))
            .await?
            .ok_or_else(|| AssistanceError::VolunteerNotFound {
                volunteer_id: volunteer_id.clone(),
            })?;
        let verified = VerifiedVolunteer::new(&volunteer)
            .map_err(|err| AssistanceError::invalid_input("volunteerId", err.to_string()))?;

        let recipients = deadline
            .run("users.query", self.users.query(&UserFilter::recipients()))
            .await?;

        let filter = EligibilityFilter::new(centre);
        let mut candidates = Vec::new();
        for snapshot in recipients {
            let recipient = self.refresh_recipient(snapshot).await?;
            let outcome = filter.evaluate(&recipient, verified);
            self.context.observer.record(AssistanceEvent::CandidateEvaluated {
                volunteer_id: volunteer_id.clone(),
                recipient_id: recipient.id().clone(),
                outcome: outcome.clone(),
            });
            if let EligibilityOutcome::Eligible { matched } = outcome {
                candidates.push(RankedCandidate {
                    recipient,
                    matched_services: matched,
                });
            }
        }
        Ok(rank(candidates))
    }

    /// Escalate a stale recipient under its lock and persist the change.
    async fn refresh_recipient(&self, snapshot: User) -> Result<User, AssistanceError> {
        let now = self.context.clock.utc();
        if !self.context.staleness.is_stale(snapshot.last_ok(), now) {
            return Ok(snapshot);
        }

        let deadline = self.context.deadline;
        let _guard = self.context.locks.lock(snapshot.id()).await;
        // The snapshot may predate a concurrent claim or confirmation.
        let Some(mut current) = deadline
            .run("users.get", self.users.get(snapshot.id()))
            .await?
        else {
            return Ok(snapshot);
        };

        let promoted = staleness::refresh_if_stale(&mut current, now, &self.context.staleness)
            .map_err(|err| AssistanceError::invalid_input("recipientId", err.to_string()))?;
        if promoted {
            let patch = UserPatch::services_of(&current, now);
            deadline
                .run("users.update", self.users.update(current.id(), &patch))
                .await?;
            patch.apply_to(&mut current);
            self.context.observer.record(AssistanceEvent::StalenessPromoted {
                recipient_id: current.id().clone(),
            });
        }
        Ok(current)
    }
}

#[async_trait]
impl<U> RecipientMatchingQuery for RecipientMatchingService<U>
where
    U: UserRepository,
{
    async fn find_nearby_recipients(
        &self,
        request: NearbyRecipientsRequest,
    ) -> Result<Vec<RankedCandidate>, Error> {
        RecipientMatchingService::find_nearby_recipients(
            self,
            &request.volunteer_id,
            request.centre,
        )
        .await
        .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "matching_service_tests.rs"]
mod tests;
