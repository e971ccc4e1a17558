//! In-process document-store adapters.
//!
//! The domain talks to persistence only through [`UserRepository`] and
//! [`MeetingRepository`]. These adapters keep documents in memory behind
//! async read/write locks and enforce the same uniqueness and missing-record
//! rules a real document store would.
//!
//! # Architecture
//!
//! - **Thin adapters**: each repository only stores, filters and patches
//!   documents. Business rules live in the domain services.
//! - **Copy semantics**: reads return clones, so callers never observe a
//!   later write through an earlier result.
//! - **Strongly typed errors**: failures are reported as the port's
//!   `define_port_error!` enums.
//!
//! [`UserRepository`]: crate::domain::ports::UserRepository
//! [`MeetingRepository`]: crate::domain::ports::MeetingRepository

mod in_memory_meeting_repository;
mod in_memory_user_repository;

pub use in_memory_meeting_repository::InMemoryMeetingRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
