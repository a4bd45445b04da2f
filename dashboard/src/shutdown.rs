use std::time::Duration;

use tokio::time::sleep;

use crate::app::SharedState;

pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: background loops cancelled");

    // Let an in-flight poll finish its device requests.
    for _ in 0..10 {
        if !state.poll_in_flight() {
            break;
        }
        sleep(Duration::from_millis(50)).await;
    }

    tracing::info!(
        pending_notifications = state.notifications().len(),
        "Shutdown sequence completed"
    );
}
