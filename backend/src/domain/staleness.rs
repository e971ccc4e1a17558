//! Staleness-driven escalation of the general wellbeing check.

use chrono::{DateTime, Duration, Utc};

use crate::domain::service_state::{self, ServiceTransitionError};
use crate::domain::{ServiceName, User};

/// Production threshold: a recipient silent for a day needs a check.
pub const DEFAULT_STALENESS_THRESHOLD_SECS: u64 = 24 * 60 * 60;

/// How long a recipient may go without confirming before a check is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    threshold: Duration,
}

impl StalenessPolicy {
    /// Build a policy from an explicit silence threshold.
    ///
    /// # Examples
    /// ```
    /// use chrono::Duration;
    /// use neighborguard::domain::StalenessPolicy;
    ///
    /// let policy = StalenessPolicy::new(Duration::minutes(1));
    /// assert_eq!(policy, StalenessPolicy::from_secs(60));
    /// ```
    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    /// Build from whole seconds, saturating at `i64::MAX`.
    pub fn from_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    /// Silence tolerated before the General Check is promoted.
    #[must_use]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Strictly more than `threshold` has elapsed since `last_ok`.
    pub fn is_stale(&self, last_ok: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(last_ok) > self.threshold
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from_secs(DEFAULT_STALENESS_THRESHOLD_SECS)
    }
}

/// Promote `"General Check"` to needed when the recipient is stale.
///
/// Returns `true` when the user was modified and must be persisted. A
/// check that is already needed or in progress is left alone, so repeated
/// calls are idempotent.
pub fn refresh_if_stale(
    recipient: &mut User,
    now: DateTime<Utc>,
    policy: &StalenessPolicy,
) -> Result<bool, ServiceTransitionError> {
    if !policy.is_stale(recipient.last_ok(), now) {
        return Ok(false);
    }
    let transition = service_state::promote_to_need(recipient, &ServiceName::general_check())?;
    Ok(transition.is_applied())
}
