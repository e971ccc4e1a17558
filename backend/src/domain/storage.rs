//! Bounded waits around driven-port calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::domain::AssistanceError;

pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound applied to every storage call made by the domain services.
///
/// Elapsed calls surface as [`AssistanceError::StorageTimeout`]; repository
/// errors as [`AssistanceError::StorageUnavailable`]. Both are retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageDeadline {
    timeout: Duration,
}

impl StorageDeadline {
    /// Deadline applied to each storage call.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Maximum time one storage call may take.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Await `fut`, failing with `StorageTimeout` once the deadline passes.
    pub async fn within<F>(
        &self,
        operation: &'static str,
        fut: F,
    ) -> Result<F::Output, AssistanceError>
    where
        F: Future,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| AssistanceError::StorageTimeout { operation })
    }

    /// Await a repository call, mapping both timeouts and port errors.
    pub async fn run<T, E, F>(&self, operation: &'static str, fut: F) -> Result<T, AssistanceError>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.within(operation, fut)
            .await?
            .map_err(|err| AssistanceError::StorageUnavailable {
                operation,
                message: err.to_string(),
            })
    }
}

impl Default for StorageDeadline {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_TIMEOUT)
    }
}
