//! HTTP server configuration object and helpers.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use neighborguard::domain::{StalenessPolicy, StorageDeadline};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings loaded from CLI flags, `NEIGHBORGUARD_*` variables and an
/// optional configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NEIGHBORGUARD")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Seconds without an "I'm OK" check-in before a recipient's
    /// General Check is promoted to need assistance.
    #[ortho_config(default = 86_400)]
    pub staleness_threshold_secs: u64,
    /// Seconds a single storage call may take before it is abandoned.
    #[ortho_config(default = 10)]
    pub storage_timeout_secs: u64,
}

impl AppSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Return the check-in staleness policy (24 hours unless overridden).
    #[must_use]
    pub fn staleness(&self) -> StalenessPolicy {
        StalenessPolicy::from_secs(self.staleness_threshold_secs)
    }

    /// Return the per-call storage deadline (ten seconds unless overridden).
    #[must_use]
    pub fn storage_deadline(&self) -> StorageDeadline {
        StorageDeadline::new(Duration::from_secs(self.storage_timeout_secs))
    }

    /// Build the server configuration described by these settings.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] with kind `InvalidInput` when the bind
    /// address does not parse.
    pub fn server_config(&self) -> std::io::Result<ServerConfig> {
        let bind_addr = self.bind_addr().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address: {err}"),
            )
        })?;
        Ok(ServerConfig::new(bind_addr)
            .with_staleness(self.staleness())
            .with_storage_deadline(self.storage_deadline()))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) staleness: StalenessPolicy,
    pub(crate) deadline: StorageDeadline,
}

impl ServerConfig {
    /// Construct a server configuration with default matching limits.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            staleness: StalenessPolicy::default(),
            deadline: StorageDeadline::default(),
        }
    }

    /// Override the check-in staleness threshold.
    #[must_use]
    pub fn with_staleness(mut self, staleness: StalenessPolicy) -> Self {
        self.staleness = staleness;
        self
    }

    /// Override the per-call storage deadline.
    #[must_use]
    pub fn with_storage_deadline(mut self, deadline: StorageDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
