//! HTTP server entry point.
//!
//! Loads configuration, builds the relay, and serves the Axum router on the
//! configured address (default `0.0.0.0:8000`). A missing credential aborts
//! before the port is bound.

use std::sync::Arc;

use anyhow::{Context, Result};
use parley_config::Settings;
use parley_server::{connect, router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let settings = Settings::from_env().context("failed to load configuration")?;
    let relay = connect(&settings).await?;
    let app = router(Arc::new(AppState::new(relay)));

    info!("Starting server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
