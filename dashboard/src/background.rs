//! Background task loops: detection polling.

use tokio::time::{MissedTickBehavior, interval};

use crate::app::SharedState;
use crate::services::detection;

/// Poll the device every `poll_interval` until shutdown.
///
/// A tick that arrives while the previous poll is still running is skipped.
pub async fn detection_poll_loop(state: SharedState) {
    let shutdown_token = state.shutdown_token().clone();
    let mut ticker = interval(state.config().poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        interval_ms = state.config().poll_interval.as_millis() as u64,
        "Detection poll loop started"
    );

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                tracing::info!("Detection poll loop stopped (shutdown)");
                return;
            }
            _ = ticker.tick() => {}
        }

        let Some(guard) = state.try_begin_poll() else {
            tracing::trace!("Previous poll still running, skipping tick");
            continue;
        };

        let s = state.clone();
        tokio::spawn(async move {
            let _guard = guard;
            detection::poll_once(&s).await;
        });
    }
}
