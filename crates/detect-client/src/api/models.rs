use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::{self, flag, opt_count, opt_number};

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

/// Firmware version from GET /version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub sw_version: String,
}

/// Detection telemetry from GET /detection_res.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default, with = "flag")]
    pub printing_status: bool,
    #[serde(default, deserialize_with = "value::lenient_f64")]
    pub print_progress: f64,
    #[serde(default, deserialize_with = "value::lenient_i64")]
    pub frame_detect_pos_count: i64,
    #[serde(default, deserialize_with = "value::lenient_f64")]
    pub frame_scores: f64,
    #[serde(default, deserialize_with = "value::lenient_i64")]
    pub total_detect_find_count: i64,
    #[serde(default, deserialize_with = "value::lenient_f64")]
    pub total_conf_count: f64,
    #[serde(default, deserialize_with = "value::lenient_i64")]
    pub total_md_count: i64,
    #[serde(default, deserialize_with = "value::lenient_i64")]
    pub no_pei: i64,
    #[serde(default, deserialize_with = "value::lenient_i64")]
    pub foreign_count: i64,
}

/// Latest camera frame from GET /capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureFrame {
    /// Base64-encoded JPEG.
    pub image: String,
    #[serde(default, deserialize_with = "value::lenient_opt_f64")]
    pub detection_score: Option<f64>,
}

/// One stored frame from GET /history_frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFrame {
    /// Base64-encoded JPEG.
    pub image: String,
}

/// Frame categories kept by the device's history buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// Spaghetti / failed extrusion.
    Noodle,
    HasPei,
    Foreign,
}

impl HistoryKind {
    pub const ALL: [HistoryKind; 3] = [Self::Noodle, Self::HasPei, Self::Foreign];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noodle => "noodle",
            Self::HasPei => "has_pei",
            Self::Foreign => "foreign",
        }
    }

    pub fn from_str_param(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Configuration blob (GET/POST /config)
// ---------------------------------------------------------------------------
//
// Every leaf is string-encoded on the wire. Keys this client does not model
// are kept in `extra` so a read-modify-write does not drop them.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub detect_setting: DetectSetting,
    #[serde(default)]
    pub video_input: VideoInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_output: Option<VideoOutput>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectSetting {
    #[serde(default, with = "flag")]
    pub is_detect_flag: bool,
    #[serde(default, with = "flag")]
    pub is_md_check: bool,
    #[serde(default, with = "opt_number", skip_serializing_if = "Option::is_none")]
    pub start_layer: Option<f64>,
    #[serde(default)]
    pub detect_config: DetectConfig,
    #[serde(default)]
    pub detect_action: DetectAction,
    #[serde(default, with = "flag")]
    pub is_pei_check: bool,
    #[serde(default, with = "flag")]
    pub is_foreign_check: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectConfig {
    #[serde(default, with = "opt_number", skip_serializing_if = "Option::is_none")]
    pub conf_thres: Option<f64>,
    #[serde(default, with = "opt_number", skip_serializing_if = "Option::is_none")]
    pub iou_thres: Option<f64>,
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub intra_num: Option<u32>,
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub inter_num: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectAction {
    #[serde(default)]
    pub alarm: AlarmAction,
    #[serde(default)]
    pub find_count: CountAction,
    #[serde(default)]
    pub conf_count: ConfCountAction,
    #[serde(default)]
    pub md_count: CountAction,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlarmAction {
    #[serde(default, with = "flag")]
    pub is_open_alarm: bool,
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub conf: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pause/cancel the print once a counter reaches `count`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountAction {
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, with = "flag")]
    pub is_pause_print: bool,
    #[serde(default, with = "flag")]
    pub is_cancel_print: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pause/cancel the print once the accumulated score reaches `conf`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfCountAction {
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub conf: Option<u32>,
    #[serde(default, with = "flag")]
    pub is_pause_print: bool,
    #[serde(default, with = "flag")]
    pub is_cancel_print: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInput {
    #[serde(default, with = "flag")]
    pub min_occluded_frame: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_output_raw: Option<RawVideoOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_output_detect: Option<DetectVideoOutput>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideoOutput {
    #[serde(default, with = "flag")]
    pub is_save_raw_video: bool,
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub save_raw_video_interval: Option<u32>,
    #[serde(default, with = "flag")]
    pub is_save_layer_best_view: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectVideoOutput {
    #[serde(default, with = "flag")]
    pub is_save_detect_video: bool,
    #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub save_detect_video_interval: Option<u32>,
    #[serde(default, with = "flag")]
    pub save_detect_pic_to_video: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
