//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("DEVICE_HOST", "127.0.0.1", "Host name or IP of the detection appliance"),
    ("DEVICE_PORT", "9010", "Port of the detection service"),
    ("DEVICE_TIMEOUT_MS", "10000", "Per-request timeout towards the device"),
    ("SERVER_PORT", "8080", "Port the dashboard listens on"),
    ("POLL_INTERVAL_MS", "1000", "Interval between detection polls"),
    ("IDLE_CAPTURE_MS", "3000", "Refresh the capture after this long without a new frame"),
    ("NOTIFICATION_CAPACITY", "5", "Maximum number of visible notifications"),
    ("NOTIFICATION_TTL_MS", "5000", "How long a notification stays visible"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
