//! Backend entry-point: loads settings, initialises tracing and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use neighborguard::inbound::http::health::HealthState;
use server::{AppSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = settings.server_config()?;
    info!(
        bind_addr = %config.bind_addr(),
        staleness_threshold_secs = settings.staleness().threshold().num_seconds(),
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
