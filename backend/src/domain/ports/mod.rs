//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe the document store the domain
//! expects; driving ports are the use cases inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod meeting_command;
mod meeting_query;
mod meeting_repository;
mod recipient_matching;
mod user_command;
mod user_repository;
mod users_query;

pub use meeting_command::{
    CancelMeetingRequest, CreateMeetingRequest, MeetingCommand, UpdateMeetingStatusRequest,
};
#[cfg(test)]
pub use meeting_command::MockMeetingCommand;
pub use meeting_query::MeetingQuery;
#[cfg(test)]
pub use meeting_query::MockMeetingQuery;
#[cfg(test)]
pub use meeting_repository::MockMeetingRepository;
pub use meeting_repository::{
    MeetingFilter, MeetingPatch, MeetingRepository, MeetingRepositoryError,
};
#[cfg(test)]
pub use recipient_matching::MockRecipientMatchingQuery;
pub use recipient_matching::{NearbyRecipientsRequest, RecipientMatchingQuery};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::{NewUser, UserCommand, UserUpdate};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserFilter, UserPatch, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{UserListFilter, UsersQuery};
