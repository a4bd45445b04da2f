//! Settings form bound to the device configuration blob.
//!
//! The form is a flat view of [`DeviceConfig`] with defaults filled in
//! for anything the device left empty. Saving reads the current blob,
//! writes the form fields back into it and posts the whole blob, so keys
//! the form does not know about survive.

use detect_client::DetectError;
use detect_client::api::{
    DetectApiClient, DetectVideoOutput, DeviceConfig, RawVideoOutput, VideoOutput,
};
use serde::{Deserialize, Serialize};

const DEFAULT_START_LAYER: f64 = 1.0;
const DEFAULT_CONF_THRES: f64 = 0.5;
const DEFAULT_IOU_THRES: f64 = 0.5;
const DEFAULT_INTRA_NUM: u32 = 4;
const DEFAULT_ALARM_COUNT: u32 = 10;
const DEFAULT_ALARM_CONF: u32 = 50;
const DEFAULT_FIND_COUNT: u32 = 20;
const DEFAULT_CONF_COUNT_CONF: u32 = 100;
const DEFAULT_MD_COUNT: u32 = 20;
const DEFAULT_VIDEO_INTERVAL: u32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Device(#[from] DetectError),
}

/// Settings as edited by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsForm {
    // Inference
    pub detect_enabled: bool,
    pub min_occluded_frame: bool,
    pub md_check: bool,
    pub pei_check: bool,
    pub foreign_check: bool,
    pub start_layer: f64,
    pub conf_thres: f64,
    pub iou_thres: f64,
    pub intra_num: u32,

    // Alarm
    pub alarm_enabled: bool,
    pub alarm_count: u32,
    pub alarm_conf: u32,

    // Detection actions
    pub find_count: u32,
    pub find_count_pause: bool,
    pub find_count_cancel: bool,
    pub conf_count_conf: u32,
    pub conf_count_pause: bool,
    pub conf_count_cancel: bool,
    pub md_count: u32,
    pub md_count_pause: bool,
    pub md_count_cancel: bool,

    // Video output
    pub save_raw_video: bool,
    pub save_raw_video_interval: u32,
    pub save_layer_best_view: bool,
    pub save_detect_video: bool,
    pub save_detect_video_interval: u32,
    pub save_detect_pic_to_video: bool,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_config(&DeviceConfig::default())
    }
}

impl SettingsForm {
    pub fn from_config(config: &DeviceConfig) -> Self {
        let ds = &config.detect_setting;
        let dc = &ds.detect_config;
        let action = &ds.detect_action;
        let raw = config
            .video_output
            .as_ref()
            .and_then(|v| v.video_output_raw.as_ref());
        let detect = config
            .video_output
            .as_ref()
            .and_then(|v| v.video_output_detect.as_ref());

        Self {
            detect_enabled: ds.is_detect_flag,
            min_occluded_frame: config.video_input.min_occluded_frame,
            md_check: ds.is_md_check,
            pei_check: ds.is_pei_check,
            foreign_check: ds.is_foreign_check,
            start_layer: ds.start_layer.unwrap_or(DEFAULT_START_LAYER),
            conf_thres: dc.conf_thres.unwrap_or(DEFAULT_CONF_THRES),
            iou_thres: dc.iou_thres.unwrap_or(DEFAULT_IOU_THRES),
            intra_num: dc.intra_num.unwrap_or(DEFAULT_INTRA_NUM),

            alarm_enabled: action.alarm.is_open_alarm,
            alarm_count: action.alarm.count.unwrap_or(DEFAULT_ALARM_COUNT),
            alarm_conf: action.alarm.conf.unwrap_or(DEFAULT_ALARM_CONF),

            find_count: action.find_count.count.unwrap_or(DEFAULT_FIND_COUNT),
            find_count_pause: action.find_count.is_pause_print,
            find_count_cancel: action.find_count.is_cancel_print,
            conf_count_conf: action.conf_count.conf.unwrap_or(DEFAULT_CONF_COUNT_CONF),
            conf_count_pause: action.conf_count.is_pause_print,
            conf_count_cancel: action.conf_count.is_cancel_print,
            md_count: action.md_count.count.unwrap_or(DEFAULT_MD_COUNT),
            md_count_pause: action.md_count.is_pause_print,
            md_count_cancel: action.md_count.is_cancel_print,

            save_raw_video: raw.is_some_and(|r| r.is_save_raw_video),
            save_raw_video_interval: non_zero(
                raw.and_then(|r| r.save_raw_video_interval),
                DEFAULT_VIDEO_INTERVAL,
            ),
            save_layer_best_view: raw.is_some_and(|r| r.is_save_layer_best_view),
            save_detect_video: detect.is_some_and(|d| d.is_save_detect_video),
            save_detect_video_interval: non_zero(
                detect.and_then(|d| d.save_detect_video_interval),
                DEFAULT_VIDEO_INTERVAL,
            ),
            save_detect_pic_to_video: detect.is_some_and(|d| d.save_detect_pic_to_video),
        }
    }

    /// Write every form field into `config`.
    ///
    /// The device keeps separate intra/inter frame counts but the form
    /// edits one value, so `inter_num` follows `intra_num`.
    pub fn apply_to(&self, config: &mut DeviceConfig) {
        config.video_input.min_occluded_frame = self.min_occluded_frame;

        let ds = &mut config.detect_setting;
        ds.is_detect_flag = self.detect_enabled;
        ds.is_md_check = self.md_check;
        ds.is_pei_check = self.pei_check;
        ds.is_foreign_check = self.foreign_check;
        ds.start_layer = Some(self.start_layer);

        let dc = &mut ds.detect_config;
        dc.conf_thres = Some(self.conf_thres);
        dc.iou_thres = Some(self.iou_thres);
        dc.intra_num = Some(self.intra_num);
        dc.inter_num = Some(self.intra_num);

        let action = &mut ds.detect_action;
        action.alarm.is_open_alarm = self.alarm_enabled;
        action.alarm.count = Some(self.alarm_count);
        action.alarm.conf = Some(self.alarm_conf);
        action.find_count.count = Some(self.find_count);
        action.find_count.is_pause_print = self.find_count_pause;
        action.find_count.is_cancel_print = self.find_count_cancel;
        action.conf_count.conf = Some(self.conf_count_conf);
        action.conf_count.is_pause_print = self.conf_count_pause;
        action.conf_count.is_cancel_print = self.conf_count_cancel;
        action.md_count.count = Some(self.md_count);
        action.md_count.is_pause_print = self.md_count_pause;
        action.md_count.is_cancel_print = self.md_count_cancel;

        let output = config.video_output.get_or_insert_with(VideoOutput::default);
        let raw = output
            .video_output_raw
            .get_or_insert_with(RawVideoOutput::default);
        raw.is_save_raw_video = self.save_raw_video;
        raw.save_raw_video_interval = Some(self.save_raw_video_interval);
        raw.is_save_layer_best_view = self.save_layer_best_view;

        let detect = output
            .video_output_detect
            .get_or_insert_with(DetectVideoOutput::default);
        detect.is_save_detect_video = self.save_detect_video;
        detect.save_detect_video_interval = Some(self.save_detect_video_interval);
        detect.save_detect_pic_to_video = self.save_detect_pic_to_video;
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_unit("conf_thres", self.conf_thres)?;
        check_unit("iou_thres", self.iou_thres)?;
        if !self.start_layer.is_finite() || self.start_layer < 0.0 {
            return Err(invalid("start_layer", "must be a non-negative number"));
        }
        if self.intra_num == 0 {
            return Err(invalid("intra_num", "must be at least 1"));
        }
        if self.save_raw_video_interval == 0 {
            return Err(invalid("save_raw_video_interval", "must be at least 1"));
        }
        if self.save_detect_video_interval == 0 {
            return Err(invalid("save_detect_video_interval", "must be at least 1"));
        }
        Ok(())
    }
}

/// Read the device configuration as a form.
pub async fn load_form(client: &DetectApiClient) -> Result<SettingsForm, SettingsError> {
    let config = client.get_config().await?;
    Ok(SettingsForm::from_config(&config))
}

/// Validate the form and write it to the device.
///
/// Returns the configuration as posted.
pub async fn save_form(
    client: &DetectApiClient,
    form: &SettingsForm,
) -> Result<DeviceConfig, SettingsError> {
    form.validate()?;

    let mut config = client.get_config().await?;
    form.apply_to(&mut config);
    client.set_config(&config).await?;

    tracing::info!("Detection settings saved");
    Ok(config)
}

/// Video intervals treat zero like a missing value.
fn non_zero(value: Option<u32>, default: u32) -> u32 {
    value.filter(|v| *v != 0).unwrap_or(default)
}

fn check_unit(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, "must be between 0 and 1"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_config() -> DeviceConfig {
        serde_json::from_value(json!({
            "detect_setting": {
                "is_detect_flag": "True",
                "is_md_check": "false",
                "start_layer": "3",
                "model_name": "v5n",
                "detect_config": {
                    "conf_thres": "0.35",
                    "iou_thres": "",
                    "intra_num": "6",
                    "inter_num": "2"
                },
                "detect_action": {
                    "alarm": { "is_open_alarm": "true", "count": "0", "conf": "70" },
                    "find_count": { "count": "15", "is_pause_print": "true", "is_cancel_print": "false" },
                    "conf_count": { "conf": "80", "is_pause_print": "false", "is_cancel_print": "true" },
                    "md_count": { "count": "", "is_pause_print": "false", "is_cancel_print": "false" }
                },
                "is_pei_check": "true",
                "is_foreign_check": "false"
            },
            "video_input": { "min_occluded_frame": "TRUE", "fps": "15" }
        }))
        .unwrap()
    }

    #[test]
    fn from_config_reads_values_and_defaults() {
        let form = SettingsForm::from_config(&device_config());

        assert!(form.detect_enabled);
        assert!(form.min_occluded_frame);
        assert!(form.pei_check);
        assert_eq!(form.start_layer, 3.0);
        assert_eq!(form.conf_thres, 0.35);
        assert_eq!(form.iou_thres, DEFAULT_IOU_THRES);
        assert_eq!(form.intra_num, 6);
        assert_eq!(form.alarm_count, 0);
        assert_eq!(form.alarm_conf, 70);
        assert!(form.find_count_pause);
        assert!(form.conf_count_cancel);
        assert_eq!(form.md_count, DEFAULT_MD_COUNT);
        assert!(!form.save_raw_video);
        assert_eq!(form.save_raw_video_interval, DEFAULT_VIDEO_INTERVAL);
    }

    #[test]
    fn default_form_uses_device_ui_defaults() {
        let form = SettingsForm::default();
        assert_eq!(form.start_layer, 1.0);
        assert_eq!(form.intra_num, 4);
        assert_eq!(form.conf_count_conf, 100);
        assert_eq!(form.save_detect_video_interval, 1000);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn apply_to_writes_strings_and_keeps_unknown_keys() {
        let mut config = device_config();
        let mut form = SettingsForm::from_config(&config);
        form.intra_num = 8;
        form.save_detect_video = true;
        form.apply_to(&mut config);

        let out = serde_json::to_value(&config).unwrap();
        let ds = &out["detect_setting"];
        assert_eq!(ds["detect_config"]["intra_num"], "8");
        assert_eq!(ds["detect_config"]["inter_num"], "8");
        assert_eq!(ds["detect_config"]["iou_thres"], "0.5");
        assert_eq!(ds["start_layer"], "3");
        assert_eq!(ds["detect_action"]["alarm"]["count"], "0");
        assert_eq!(ds["is_detect_flag"], "true");
        assert_eq!(ds["model_name"], "v5n");
        assert_eq!(out["video_input"]["fps"], "15");
        assert_eq!(
            out["video_output"]["video_output_detect"]["is_save_detect_video"],
            "true"
        );
        assert_eq!(
            out["video_output"]["video_output_raw"]["save_raw_video_interval"],
            "1000"
        );
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut form = SettingsForm::default();
        form.conf_thres = 1.5;
        assert!(matches!(
            form.validate(),
            Err(SettingsError::Invalid { field: "conf_thres", .. })
        ));

        let mut form = SettingsForm::default();
        form.intra_num = 0;
        assert!(form.validate().is_err());

        let mut form = SettingsForm::default();
        form.save_raw_video_interval = 0;
        assert!(form.validate().is_err());
    }
}
