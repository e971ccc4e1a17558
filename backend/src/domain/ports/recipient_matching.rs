//! Driving port for the volunteer-facing recipient search.

use async_trait::async_trait;

use crate::domain::{Coordinate, Error, RankedCandidate, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRecipientsRequest {
    pub volunteer_id: UserId,
    /// Optional centre for the 1 km location filter.
    pub centre: Option<Coordinate>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipientMatchingQuery: Send + Sync {
    /// Eligible recipients for the volunteer, highest priority first.
    ///
    /// Stale recipients are escalated and persisted as a side effect.
    async fn find_nearby_recipients(
        &self,
        request: NearbyRecipientsRequest,
    ) -> Result<Vec<RankedCandidate>, Error>;
}
