//! Parcel tracker entry-point: loads configuration, wires the tracking
//! pipeline and serves it over HTTP.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use parcel_tracker::config::TrackerSettings;
use parcel_tracker::inbound::http::health::HealthState;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = TrackerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load configuration: {err}")))?;
    let bind_addr = settings.bind_addr()?;
    let http_state = build_http_state(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), ServerConfig::new(bind_addr, http_state))?;
    info!(%bind_addr, "parcel tracker listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    info!("parcel tracker stopped");
    outcome
}
