pub mod app;
pub mod background;
pub mod config;
pub mod events;
pub mod notification;
pub mod server;
pub mod services;
pub mod shutdown;

use config::{AppConfig, SettingsManager};

use crate::app::SharedState;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load environment and build the runtime config.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let sm = SettingsManager::from_env();
    let invalid = sm.invalid_settings();
    if !invalid.is_empty() {
        tracing::warn!("Invalid settings replaced by defaults: {:?}", invalid);
    }

    let config = AppConfig::load(&sm)?;
    tracing::info!(
        device = %format!("{}:{}", config.device_host, config.device_port),
        port = config.server_port,
        "Settings loaded"
    );
    Ok(config)
}

/// Spawn the loops that run for the lifetime of the process.
pub fn spawn_background_tasks(state: &SharedState) {
    let s = state.clone();
    tokio::spawn(async move { background::detection_poll_loop(s).await });

    // Startup version check, surfaced as a notification.
    let s = state.clone();
    tokio::spawn(async move {
        if let Err(e) = services::detection::announce_version(&s).await {
            tracing::debug!("Startup version check failed: {e}");
        }
    });
}
