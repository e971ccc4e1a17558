//! Decides whether a recipient should be shown to a volunteer.
//!
//! Evaluation is pure: it reads both users and returns an
//! [`EligibilityOutcome`] describing the decision. Reporting is left to the
//! caller's [`AssistanceObserver`](crate::domain::AssistanceObserver).

use crate::domain::{Coordinate, ServiceName, ServiceStatus, User, UserId, geo};

/// Raised when the user evaluating candidates is not a volunteer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {user_id} is not a volunteer")]
pub struct NotAVolunteer {
    pub user_id: UserId,
}

/// A user whose volunteer role has been checked.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedVolunteer<'a>(&'a User);

impl<'a> VerifiedVolunteer<'a> {
    /// Accept `user` only when it is a volunteer.
    pub fn new(user: &'a User) -> Result<Self, NotAVolunteer> {
        if user.is_volunteer() {
            Ok(Self(user))
        } else {
            Err(NotAVolunteer {
                user_id: user.id().clone(),
            })
        }
    }

    /// The verified volunteer.
    pub fn user(&self) -> &'a User {
        self.0
    }
}

/// Why a recipient was filtered out.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    NotARecipient,
    OutsideArea { distance_km: f64 },
    NoSharedLanguage,
    NoMatchingService,
}

/// Result of evaluating one recipient for one volunteer.
///
/// The filter never logs; callers forward rejections to the
/// [`AssistanceObserver`](crate::domain::AssistanceObserver).
#[derive(Debug, Clone, PartialEq)]
pub enum EligibilityOutcome {
    /// `matched` lists services the recipient needs and the volunteer provides.
    Eligible { matched: Vec<ServiceName> },
    Rejected(RejectionReason),
}

impl EligibilityOutcome {
    /// `true` when the recipient should be listed.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }
}

/// Eligibility rules with an optional caller-supplied location filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EligibilityFilter {
    centre: Option<Coordinate>,
}

impl EligibilityFilter {
    /// Build a filter; `None` skips the location check.
    #[must_use]
    pub fn new(centre: Option<Coordinate>) -> Self {
        Self { centre }
    }

    /// Centre of the location filter, if one was supplied.
    #[must_use]
    pub fn centre(&self) -> Option<Coordinate> {
        self.centre
    }

    /// Evaluate `recipient` for `volunteer`.
    ///
    /// The location filter compares the recipient with the filter centre,
    /// never with the volunteer's own location.
    pub fn evaluate(
        &self,
        recipient: &User,
        volunteer: VerifiedVolunteer<'_>,
    ) -> EligibilityOutcome {
        let volunteer = volunteer.user();
        if !recipient.is_recipient() {
            return EligibilityOutcome::Rejected(RejectionReason::NotARecipient);
        }
        if let Some(centre) = self.centre {
            let location = recipient.location();
            if !geo::is_nearby(&location, &centre) {
                return EligibilityOutcome::Rejected(RejectionReason::OutsideArea {
                    distance_km: location.distance_km(&centre),
                });
            }
        }
        if recipient.shared_languages(volunteer).next().is_none() {
            return EligibilityOutcome::Rejected(RejectionReason::NoSharedLanguage);
        }

        let matched = matching_services(recipient, volunteer);
        if matched.is_empty() {
            EligibilityOutcome::Rejected(RejectionReason::NoMatchingService)
        } else {
            EligibilityOutcome::Eligible { matched }
        }
    }

    /// Shorthand for [`EligibilityFilter::evaluate`] being eligible.
    pub fn eligible(&self, recipient: &User, volunteer: VerifiedVolunteer<'_>) -> bool {
        self.evaluate(recipient, volunteer).is_eligible()
    }
}

/// Services the recipient needs that the volunteer provides. Services
/// already in progress never match.
pub fn matching_services(recipient: &User, volunteer: &User) -> Vec<ServiceName> {
    recipient
        .services()
        .iter()
        .filter(|(_, status)| **status == ServiceStatus::NeedAssistance)
        .filter(|(name, _)| volunteer.service_status(name) == Some(ServiceStatus::Provide))
        .map(|(name, _)| name.clone())
        .collect()
}
