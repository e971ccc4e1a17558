//! NeighborGuard library: matching volunteers with recipients who need
//! in-person assistance and coordinating their meetings.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the matching and
//! assistance-state engine with its ports, [`outbound`] the storage adapters
//! and [`inbound`] the HTTP surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
