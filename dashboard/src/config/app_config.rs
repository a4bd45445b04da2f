//! Runtime application configuration resolved from environment + defaults.

use std::time::Duration;

use detect_client::api::DEFAULT_TIMEOUT;

use super::defaults::get_default;
use super::manager::SettingsManager;
use crate::notification::queue;

/// Runtime configuration populated by the settings manager.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub device_host: String,
    pub device_port: u16,
    pub device_timeout: Duration,
    pub server_port: u16,
    pub poll_interval: Duration,
    pub idle_capture: Duration,
    pub notification_capacity: usize,
    pub notification_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_host: "127.0.0.1".into(),
            device_port: detect_client::DEFAULT_DEVICE_PORT,
            device_timeout: DEFAULT_TIMEOUT,
            server_port: 8080,
            poll_interval: Duration::from_millis(1000),
            idle_capture: Duration::from_millis(3000),
            notification_capacity: queue::DEFAULT_CAPACITY,
            notification_ttl: queue::DEFAULT_TTL,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> { sm.get_setting(key) };

        Ok(Self {
            device_host: g("DEVICE_HOST")?,
            device_port: parse_num(&g("DEVICE_PORT")?, "DEVICE_PORT")?,
            device_timeout: Duration::from_millis(parse_num(
                &g("DEVICE_TIMEOUT_MS")?,
                "DEVICE_TIMEOUT_MS",
            )?),
            server_port: parse_num(&g("SERVER_PORT")?, "SERVER_PORT")?,
            poll_interval: Duration::from_millis(parse_num(
                &g("POLL_INTERVAL_MS")?,
                "POLL_INTERVAL_MS",
            )?),
            idle_capture: Duration::from_millis(parse_num(
                &g("IDLE_CAPTURE_MS")?,
                "IDLE_CAPTURE_MS",
            )?),
            notification_capacity: parse_num(
                &g("NOTIFICATION_CAPACITY")?,
                "NOTIFICATION_CAPACITY",
            )?,
            notification_ttl: Duration::from_millis(parse_num(
                &g("NOTIFICATION_TTL_MS")?,
                "NOTIFICATION_TTL_MS",
            )?),
        })
    }
}

/// Parse a validated value, falling back to the table default.
fn parse_num<T: std::str::FromStr>(s: &str, key: &str) -> Result<T, anyhow::Error> {
    if let Ok(v) = s.parse() {
        return Ok(v);
    }
    get_default(key)
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("setting {key} has no usable value"))
}
