use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use detect_client::api::DetectApiClient;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, broadcast};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::notification::{BroadcastSurface, NotificationQueue};
use crate::services::status::DetectionStatus;

/// Application shared state accessible from background loops and axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for WebSocket messages
    ws_tx: broadcast::Sender<String>,
    config: AppConfig,
    client: DetectApiClient,
    notifications: NotificationQueue,
    status: RwLock<DetectionStatus>,
    /// Set while a detection poll is running
    poll_in_flight: AtomicBool,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Build shared state, connecting the REST client to the configured device.
    pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
        let client = DetectApiClient::new(
            &config.device_host,
            config.device_port,
            config.device_timeout,
        )?;
        Ok(Self::with_client(config, client))
    }

    /// Build shared state around an existing client.
    pub fn with_client(config: AppConfig, client: DetectApiClient) -> Self {
        let (ws_tx, _) = broadcast::channel(1024);
        let surface = Arc::new(BroadcastSurface::new(ws_tx.clone()));
        let notifications = NotificationQueue::new(
            config.notification_capacity,
            config.notification_ttl,
            surface,
        );

        Self {
            inner: Arc::new(SharedStateInner {
                ws_tx,
                config,
                client,
                notifications,
                status: RwLock::new(DetectionStatus::default()),
                poll_in_flight: AtomicBool::new(false),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &DetectApiClient {
        &self.inner.client
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.inner.notifications
    }

    pub fn ws_sender(&self) -> &broadcast::Sender<String> {
        &self.inner.ws_tx
    }

    pub fn subscribe_ws(&self) -> broadcast::Receiver<String> {
        self.inner.ws_tx.subscribe()
    }

    pub async fn status(&self) -> RwLockReadGuard<'_, DetectionStatus> {
        self.inner.status.read().await
    }

    pub async fn status_mut(&self) -> RwLockWriteGuard<'_, DetectionStatus> {
        self.inner.status.write().await
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    /// Claim the poll slot. Returns `None` while another poll is running.
    pub fn try_begin_poll(&self) -> Option<PollGuard> {
        self.inner
            .poll_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollGuard {
                state: self.clone(),
            })
    }

    pub fn poll_in_flight(&self) -> bool {
        self.inner.poll_in_flight.load(Ordering::Acquire)
    }
}

/// Releases the poll slot when dropped.
pub struct PollGuard {
    state: SharedState,
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.state
            .inner
            .poll_in_flight
            .store(false, Ordering::Release);
    }
}
