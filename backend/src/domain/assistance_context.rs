//! Collaborators shared by the matching, meeting and user services.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::{
    AssistanceObserver, RecipientLocks, StalenessPolicy, StorageDeadline, TracingObserver,
};

/// Clock, locks, observer and limits injected into every domain service.
///
/// All services built for one process must share a single context so they
/// serialise on the same per-recipient locks.
#[derive(Clone)]
pub struct AssistanceContext {
    pub locks: Arc<RecipientLocks>,
    pub clock: Arc<dyn Clock>,
    pub observer: Arc<dyn AssistanceObserver>,
    pub deadline: StorageDeadline,
    pub staleness: StalenessPolicy,
}

impl AssistanceContext {
    /// Context with default deadline and staleness policy.
    pub fn new(clock: Arc<dyn Clock>, observer: Arc<dyn AssistanceObserver>) -> Self {
        Self {
            locks: Arc::new(RecipientLocks::new()),
            clock,
            observer,
            deadline: StorageDeadline::default(),
            staleness: StalenessPolicy::default(),
        }
    }

    /// Override the per-call storage deadline.
    pub fn with_deadline(mut self, deadline: StorageDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Override the check-in staleness policy.
    pub fn with_staleness(mut self, staleness: StalenessPolicy) -> Self {
        self.staleness = staleness;
        self
    }
}

impl Default for AssistanceContext {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock), Arc::new(TracingObserver))
    }
}
