//! drive_clone server - clone Google Drive template folders over HTTP.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use drive_clone::{router, AppState, Config, DriveClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let auth = config
        .token_source()
        .await
        .with_context(|| format!("Failed to initialize {:?} credentials", config.auth_mode))?;

    let client = DriveClient::with_base_url(auth, config.drive_api_base.clone());
    let state = AppState::new(Arc::new(client)).with_folder_url_prefix(config.folder_url_prefix.clone());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Listening on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
