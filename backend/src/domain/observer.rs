//! Structured observability hook for matching and meeting decisions.
//!
//! Services report what they decided through [`AssistanceObserver`] after
//! the decision is made. The default [`TracingObserver`] turns events into
//! `tracing` records.

use crate::domain::{
    AssistanceError, EligibilityOutcome, MeetingId, RejectionReason, ServiceName,
    ServiceTransitionError, UserId,
};

/// Something the matching or meeting services decided.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistanceEvent {
    CandidateEvaluated {
        volunteer_id: UserId,
        recipient_id: UserId,
        outcome: EligibilityOutcome,
    },
    StalenessPromoted {
        recipient_id: UserId,
    },
    ServiceClaimed {
        recipient_id: UserId,
        service: ServiceName,
    },
    ServiceSkipped {
        recipient_id: UserId,
        service: ServiceName,
        reason: ServiceTransitionError,
    },
    ServiceReleased {
        recipient_id: UserId,
        service: ServiceName,
    },
    MeetingCreated {
        meeting_id: MeetingId,
        recipient_id: UserId,
        volunteer_id: UserId,
        dropped: Vec<ServiceName>,
    },
    MeetingCancelled {
        meeting_id: MeetingId,
        acting_user_id: UserId,
    },
    MeetingStatusChanged {
        meeting_id: MeetingId,
    },
    /// The meeting insert failed and the claims were rolled back.
    /// `restored` is false when persisting the rollback failed too.
    ClaimsCompensated {
        recipient_id: UserId,
        error: AssistanceError,
        restored: bool,
    },
    PartialData {
        meeting_id: MeetingId,
        error: AssistanceError,
    },
}

/// Sink for [`AssistanceEvent`]s.
pub trait AssistanceObserver: Send + Sync {
    fn record(&self, event: AssistanceEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AssistanceObserver for NoopObserver {
    fn record(&self, _event: AssistanceEvent) {}
}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AssistanceObserver for TracingObserver {
    fn record(&self, event: AssistanceEvent) {
        match event {
            AssistanceEvent::CandidateEvaluated {
                volunteer_id,
                recipient_id,
                outcome,
            } => match outcome {
                EligibilityOutcome::Eligible { matched } => tracing::debug!(
                    volunteer_id = %volunteer_id,
                    recipient_id = %recipient_id,
                    matched = matched.len(),
                    "recipient eligible"
                ),
                EligibilityOutcome::Rejected(reason) => tracing::trace!(
                    volunteer_id = %volunteer_id,
                    recipient_id = %recipient_id,
                    reason = rejection_label(&reason),
                    "recipient filtered out"
                ),
            },
            AssistanceEvent::StalenessPromoted { recipient_id } => tracing::info!(
                recipient_id = %recipient_id,
                "general check escalated after staleness"
            ),
            AssistanceEvent::ServiceClaimed {
                recipient_id,
                service,
            } => tracing::debug!(
                recipient_id = %recipient_id,
                service = %service,
                "service claimed"
            ),
            AssistanceEvent::ServiceSkipped {
                recipient_id,
                service,
                reason,
            } => tracing::info!(
                recipient_id = %recipient_id,
                service = %service,
                reason = %reason,
                "service skipped"
            ),
            AssistanceEvent::ServiceReleased {
                recipient_id,
                service,
            } => tracing::debug!(
                recipient_id = %recipient_id,
                service = %service,
                "service released"
            ),
            AssistanceEvent::MeetingCreated {
                meeting_id,
                recipient_id,
                volunteer_id,
                dropped,
            } => {
                if dropped.is_empty() {
                    tracing::info!(
                        meeting_id = %meeting_id,
                        recipient_id = %recipient_id,
                        volunteer_id = %volunteer_id,
                        "meeting created"
                    );
                } else {
                    tracing::warn!(
                        meeting_id = %meeting_id,
                        recipient_id = %recipient_id,
                        volunteer_id = %volunteer_id,
                        dropped = ?dropped,
                        "meeting created without some requested services"
                    );
                }
            }
            AssistanceEvent::MeetingCancelled {
                meeting_id,
                acting_user_id,
            } => tracing::info!(
                meeting_id = %meeting_id,
                acting_user_id = %acting_user_id,
                "meeting cancelled"
            ),
            AssistanceEvent::MeetingStatusChanged { meeting_id } => {
                tracing::info!(meeting_id = %meeting_id, "meeting status updated");
            }
            AssistanceEvent::ClaimsCompensated {
                recipient_id,
                error,
                restored,
            } => {
                if restored {
                    tracing::warn!(
                        recipient_id = %recipient_id,
                        error = %error,
                        "meeting insert failed; claimed services released"
                    );
                } else {
                    tracing::error!(
                        recipient_id = %recipient_id,
                        error = %error,
                        "meeting insert failed and claimed services could not be released"
                    );
                }
            }
            AssistanceEvent::PartialData { meeting_id, error } => tracing::warn!(
                meeting_id = %meeting_id,
                error = %error,
                "participant details unavailable"
            ),
        }
    }
}

fn rejection_label(reason: &RejectionReason) -> &'static str {
    match reason {
        RejectionReason::NotARecipient => "not_a_recipient",
        RejectionReason::OutsideArea { .. } => "outside_area",
        RejectionReason::NoSharedLanguage => "no_shared_language",
        RejectionReason::NoMatchingService => "no_matching_service",
    }
}
