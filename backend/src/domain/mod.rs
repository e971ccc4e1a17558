//! Domain primitives, assistance rules and services.
//!
//! Purpose: Define strongly typed users, meetings and service statuses, the
//! pure matching rules that operate on them, and the domain services that
//! coordinate those rules with the persistence ports. Nothing here depends
//! on HTTP or a concrete store.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - AssistanceError — closed failure taxonomy raised by the services.
//! - User, Meeting — aggregates validated on construction.
//! - RecipientMatchingService, MeetingCoordinator, UserService — driving
//!   port implementations.

pub mod assistance;
pub mod assistance_context;
pub mod assistance_error;
pub mod eligibility;
pub mod error;
pub mod geo;
pub mod matching_service;
pub mod meeting;
pub mod meeting_service;
pub mod observer;
pub mod ports;
pub mod ranking;
pub mod recipient_locks;
pub mod service_state;
pub mod staleness;
pub mod storage;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::assistance::{
    GENERAL_CHECK, ParseServiceStatusError, ServiceName, ServiceNameValidationError, ServiceStatus,
};
pub use self::assistance_context::AssistanceContext;
pub use self::assistance_error::{AssistanceError, ErrorKind};
pub use self::eligibility::{
    EligibilityFilter, EligibilityOutcome, NotAVolunteer, RejectionReason, VerifiedVolunteer,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::geo::Coordinate;
pub use self::matching_service::RecipientMatchingService;
pub use self::meeting::{
    Meeting, MeetingDetails, MeetingDraft, MeetingId, MeetingStatus, MeetingValidationError,
};
pub use self::meeting_service::MeetingCoordinator;
pub use self::observer::{AssistanceEvent, AssistanceObserver, NoopObserver, TracingObserver};
pub use self::ranking::{RankedCandidate, rank};
pub use self::recipient_locks::{RecipientLocks, UserLockGuard, UserLockSet};
pub use self::service_state::{ServiceTransitionError, Transition};
pub use self::staleness::StalenessPolicy;
pub use self::storage::StorageDeadline;
pub use self::trace_id::TraceId;
pub use self::user::{
    Address, ContactDetails, EmailAddress, Gender, Role, User, UserDraft, UserId,
    UserValidationError,
};
pub use self::user_service::UserService;
