//! Print and detection status derived from device telemetry.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};
use detect_client::api::{CaptureFrame, DetectionResult, HistoryFrame, HistoryKind};
use serde::Serialize;
use tokio::time::Instant;

use crate::notification::types::category;

/// Counters reported alongside each detected frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionCounters {
    pub frame_detect_pos_count: i64,
    pub frame_scores: f64,
    pub total_detect_find_count: i64,
    pub total_conf_count: f64,
    pub total_md_count: i64,
    pub no_pei: i64,
    pub foreign_count: i64,
}

/// An alert raised by a newly detected frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub message: &'static str,
    pub category: &'static str,
}

pub const NO_PEI_ALERT: Alert = Alert {
    message: "No PEI detected",
    category: category::NO_PEI,
};

pub const FOREIGN_ALERT: Alert = Alert {
    message: "Foreign object detected",
    category: category::FOREIGN,
};

/// What the poller should fetch after applying a detection result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub frame_changed: bool,
    pub refresh_history: bool,
    pub refresh_capture: bool,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Default)]
pub struct DetectionStatus {
    pub connected: bool,
    pub printing: bool,
    pub print_progress: f64,
    pub counters: DetectionCounters,
    /// `None` until the first frame change; counts as long idle.
    last_frame_change: Option<Instant>,
    capture: Option<CaptureFrame>,
    history: HashMap<HistoryKind, Vec<HistoryFrame>>,
    capture_error_since: Option<Instant>,
    capture_error: Option<String>,
    last_poll_at: Option<DateTime<Utc>>,
}

impl DetectionStatus {
    /// Fold one `/detection_res` reply into the status.
    ///
    /// A changed `frame_detect_pos_count` means a new detected frame:
    /// counters are taken over, alerts raised and both history and capture
    /// refreshed. Otherwise the capture is refreshed once the frame count
    /// has been idle for `idle_capture`.
    pub fn apply(
        &mut self,
        result: &DetectionResult,
        now: Instant,
        idle_capture: Duration,
    ) -> PollOutcome {
        self.connected = true;
        self.printing = result.printing_status;
        self.print_progress = result.print_progress;
        self.last_poll_at = Some(Utc::now());

        let previous = self.counters.frame_detect_pos_count;
        self.counters.frame_detect_pos_count = result.frame_detect_pos_count;

        let mut outcome = PollOutcome::default();

        if previous != result.frame_detect_pos_count {
            self.last_frame_change = Some(now);
            self.counters = DetectionCounters {
                frame_detect_pos_count: result.frame_detect_pos_count,
                frame_scores: result.frame_scores,
                total_detect_find_count: result.total_detect_find_count,
                total_conf_count: result.total_conf_count,
                total_md_count: result.total_md_count,
                no_pei: result.no_pei,
                foreign_count: result.foreign_count,
            };

            if self.counters.no_pei > 0 {
                outcome.alerts.push(NO_PEI_ALERT);
            }
            if self.counters.foreign_count > 0 {
                outcome.alerts.push(FOREIGN_ALERT);
            }

            outcome.frame_changed = true;
            outcome.refresh_history = true;
            outcome.refresh_capture = true;
        } else {
            let idle = self
                .last_frame_change
                .is_none_or(|t| now.saturating_duration_since(t) >= idle_capture);
            if idle {
                outcome.refresh_capture = true;
                self.last_frame_change = Some(now);
            }
        }

        outcome
    }

    /// The device answered with a non-success status.
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
        self.last_poll_at = Some(Utc::now());
    }

    pub fn record_capture(&mut self, frame: CaptureFrame) {
        self.capture = Some(frame);
        self.capture_error = None;
        self.capture_error_since = None;
    }

    /// Track a failed capture. The elapsed time counts from the first
    /// failure in the current streak.
    pub fn record_capture_error(&mut self, error: &str, now: Instant) {
        let since = *self.capture_error_since.get_or_insert(now);
        let elapsed = now.saturating_duration_since(since).as_secs_f64();
        self.capture_error = Some(format!("capture failed for {elapsed:.2}s: {error}"));
    }

    pub fn set_history(&mut self, history: HashMap<HistoryKind, Vec<HistoryFrame>>) {
        self.history = history;
    }

    pub fn capture(&self) -> Option<&CaptureFrame> {
        self.capture.as_ref()
    }

    pub fn capture_error(&self) -> Option<&str> {
        self.capture_error.as_deref()
    }

    pub fn history(&self, kind: HistoryKind) -> &[HistoryFrame] {
        self.history.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn printing_label(&self) -> String {
        if self.printing {
            format!("Printing {:.2}%", self.print_progress)
        } else {
            "Not printing".to_string()
        }
    }

    /// Progress bar fill in percent.
    pub fn progress_width(&self) -> f64 {
        if self.printing {
            self.print_progress.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// Caption shown under the capture image.
    pub fn caption(&self) -> String {
        let score = self
            .capture
            .as_ref()
            .and_then(|c| c.detection_score)
            .map_or_else(|| "N/A".to_string(), |s| s.to_string());
        let c = &self.counters;
        format!(
            "score:{score}\nframes:{}\nanomalies:{}\ntotal score:{}\nMD:{}\nNO_PEI:{}\nforeign:{}",
            c.frame_detect_pos_count,
            c.total_detect_find_count,
            c.total_conf_count,
            c.total_md_count,
            c.no_pei,
            c.foreign_count,
        )
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            connected: self.connected,
            printing: self.printing,
            print_progress: self.print_progress,
            printing_label: self.printing_label(),
            progress_width: self.progress_width(),
            counters: self.counters.clone(),
            caption: self.caption(),
            has_capture: self.capture.is_some(),
            capture_score: self.capture.as_ref().and_then(|c| c.detection_score),
            capture_error: self.capture_error.clone(),
            history_counts: HistoryKind::ALL
                .into_iter()
                .map(|k| (k.as_str().to_string(), self.history(k).len()))
                .collect(),
            last_poll_at: self.last_poll_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Serializable view pushed to dashboard clients.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub connected: bool,
    pub printing: bool,
    pub print_progress: f64,
    pub printing_label: String,
    pub progress_width: f64,
    pub counters: DetectionCounters,
    pub caption: String,
    pub has_capture: bool,
    pub capture_score: Option<f64>,
    pub capture_error: Option<String>,
    pub history_counts: BTreeMap<String, usize>,
    pub last_poll_at: Option<String>,
}
