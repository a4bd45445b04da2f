use serde_json::Value;

use super::*;

impl DetectApiClient {
    /// GET /config
    ///
    /// An empty object means the device could not load its config file,
    /// which is reported as [`DetectError::EmptyConfig`].
    pub async fn get_config(&self) -> Result<DeviceConfig, DetectError> {
        let url = self.endpoint("config")?;
        let raw: Value = self.get_json(url).await?;
        if raw.as_object().is_none_or(|o| o.is_empty()) {
            return Err(DetectError::EmptyConfig);
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// POST /config – replace the device configuration.
    pub async fn set_config(&self, config: &DeviceConfig) -> Result<(), DetectError> {
        let url = self.endpoint("config")?;
        self.post_pretty_json(url, config).await?;
        tracing::info!("Device configuration written");
        Ok(())
    }
}
