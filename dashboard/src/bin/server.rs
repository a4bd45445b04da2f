//! Dashboard server binary.
//!
//! Starts the axum web server, the detection poller, and signal handling.

use tracing_subscriber::EnvFilter;

use detect_dashboard_lib::app::SharedState;
use detect_dashboard_lib::server;
use detect_dashboard_lib::shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting detection dashboard");

    let config = detect_dashboard_lib::init_foundation()?;
    let state = SharedState::new(config)?;

    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    detect_dashboard_lib::spawn_background_tasks(&state);

    tracing::info!(
        port = state.server_port(),
        "Dashboard running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    shutdown::graceful_shutdown(&state).await;
    if let Err(e) = server_handle.await {
        tracing::warn!("Server task ended abnormally: {e}");
    }
    Ok(())
}
