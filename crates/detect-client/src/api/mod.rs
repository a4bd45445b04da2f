//! Detection service REST API client.
//!
//! Provides typed access to the endpoints served by the appliance on
//! port 9010: telemetry, captured frames, the configuration blob and
//! the recorded video store.

mod config;
mod detection;
mod request;
mod videos;

pub mod models;

pub use models::{
    AlarmAction, CaptureFrame, ConfCountAction, CountAction, DetectAction, DetectConfig,
    DetectSetting, DetectVideoOutput, DetectionResult, DeviceConfig, HistoryFrame, HistoryKind,
    RawVideoOutput, VersionInfo, VideoInput, VideoOutput,
};

use std::time::Duration;

use url::Url;

use crate::DetectError;

/// Per-request timeout unless the caller chooses one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client bound to one detection appliance.
#[derive(Clone)]
pub struct DetectApiClient {
    pub(super) http: reqwest::Client,
    pub(super) base: Url,
}
