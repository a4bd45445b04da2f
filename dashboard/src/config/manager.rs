//! SettingsManager: environment-backed settings with defaults and validation.

use std::collections::HashMap;

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;

/// Resolves setting keys against a value source, falling back to defaults.
pub struct SettingsManager {
    overrides: HashMap<String, String>,
}

impl SettingsManager {
    /// Read every known key from the process environment.
    pub fn from_env() -> Self {
        let overrides = DEFAULT_SETTINGS
            .keys()
            .filter_map(|key| {
                std::env::var(key)
                    .ok()
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), v))
            })
            .collect();
        Self { overrides }
    }

    pub fn from_map(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Get a setting value.
    ///
    /// Invalid overrides are logged and replaced by the default.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;

        let Some(value) = self.overrides.get(key) else {
            return Ok(def.default.to_string());
        };

        match validate_setting(key, value) {
            Ok(()) => Ok(value.clone()),
            Err(e) => {
                tracing::warn!(
                    key,
                    value = %value,
                    default = def.default,
                    description = def.description,
                    "Invalid setting ({e}), using default"
                );
                Ok(def.default.to_string())
            }
        }
    }

    /// Keys that were overridden but failed validation.
    pub fn invalid_settings(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .overrides
            .iter()
            .filter(|(k, v)| DEFAULT_SETTINGS.contains_key(k.as_str()) && validate_setting(k, v).is_err())
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}
