//! Per-(recipient, service) assistance status transitions.
//!
//! ```text
//! DoNotNeedAssistance -> NeedAssistance -> InProgress -> NeedAssistance
//!                                                     \-> DoNotNeedAssistance
//! ```
//!
//! These functions are the only writers of a recipient's service statuses.
//! They mutate an in-memory [`User`]; callers must hold the recipient's lock
//! from [`RecipientLocks`](crate::domain::RecipientLocks) across the
//! read-modify-write so two claims on the same pair cannot both succeed.

use crate::domain::{ServiceName, ServiceStatus, User, UserId};

/// Rejected service status transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceTransitionError {
    #[error("service {service} is not claimable (current status: {current:?})")]
    NotClaimable {
        service: ServiceName,
        current: Option<ServiceStatus>,
    },
    #[error("service {service} is not in progress (current status: {current:?})")]
    NotReleasable {
        service: ServiceName,
        current: Option<ServiceStatus>,
    },
    #[error("user {user_id} is not a recipient")]
    NotARecipient { user_id: UserId },
}

/// Whether a transition changed the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status moved and the recipient must be persisted.
    Applied,
    /// The status already satisfied the request; nothing to write.
    Unchanged,
}

impl Transition {
    /// `true` for [`Transition::Applied`].
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

fn ensure_recipient(user: &User) -> Result<(), ServiceTransitionError> {
    if user.is_recipient() {
        Ok(())
    } else {
        Err(ServiceTransitionError::NotARecipient {
            user_id: user.id().clone(),
        })
    }
}

/// Mark `service` as needed. Already needed or in progress is a no-op; an
/// unknown service is added as needed.
pub fn promote_to_need(
    recipient: &mut User,
    service: &ServiceName,
) -> Result<Transition, ServiceTransitionError> {
    ensure_recipient(recipient)?;
    match recipient.service_status(service) {
        Some(ServiceStatus::NeedAssistance | ServiceStatus::InProgress) => {
            Ok(Transition::Unchanged)
        }
        _ => {
            recipient.set_service_status(service.clone(), ServiceStatus::NeedAssistance);
            Ok(Transition::Applied)
        }
    }
}

/// Move `service` from needed to in progress.
pub fn claim(recipient: &mut User, service: &ServiceName) -> Result<(), ServiceTransitionError> {
    ensure_recipient(recipient)?;
    match recipient.service_status(service) {
        Some(ServiceStatus::NeedAssistance) => {
            recipient.set_service_status(service.clone(), ServiceStatus::InProgress);
            Ok(())
        }
        current => Err(ServiceTransitionError::NotClaimable {
            service: service.clone(),
            current,
        }),
    }
}

/// Return an interrupted service to needed.
pub fn release(recipient: &mut User, service: &ServiceName) -> Result<(), ServiceTransitionError> {
    ensure_recipient(recipient)?;
    match recipient.service_status(service) {
        Some(ServiceStatus::InProgress) => {
            recipient.set_service_status(service.clone(), ServiceStatus::NeedAssistance);
            Ok(())
        }
        current => Err(ServiceTransitionError::NotReleasable {
            service: service.clone(),
            current,
        }),
    }
}

/// Clear a need, whether or not it is being handled.
pub fn resolve(
    recipient: &mut User,
    service: &ServiceName,
) -> Result<Transition, ServiceTransitionError> {
    ensure_recipient(recipient)?;
    match recipient.service_status(service) {
        Some(ServiceStatus::NeedAssistance | ServiceStatus::InProgress) => {
            recipient.set_service_status(service.clone(), ServiceStatus::DoNotNeedAssistance);
            Ok(Transition::Applied)
        }
        Some(_) => Ok(Transition::Unchanged),
        None => {
            recipient.set_service_status(service.clone(), ServiceStatus::DoNotNeedAssistance);
            Ok(Transition::Applied)
        }
    }
}

/// Completion ends the meeting, not the need; service status is untouched.
pub fn complete(
    recipient: &User,
    _service: &ServiceName,
) -> Result<Transition, ServiceTransitionError> {
    ensure_recipient(recipient)?;
    Ok(Transition::Unchanged)
}
