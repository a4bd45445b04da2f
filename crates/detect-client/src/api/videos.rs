use super::*;

impl DetectApiClient {
    /// GET /get-video-list – file names of recorded videos.
    pub async fn list_videos(&self) -> Result<Vec<String>, DetectError> {
        let url = self.endpoint("get-video-list")?;
        self.get_json(url).await
    }

    /// GET /download-video/{name} – raw video file.
    pub async fn download_video(&self, name: &str) -> Result<Vec<u8>, DetectError> {
        let url = self.endpoint_with_segment("download-video/", name)?;
        let bytes = self.get_bytes(url).await?;
        tracing::debug!(name, size = bytes.len(), "Video downloaded");
        Ok(bytes)
    }

    /// DELETE /delete-video/{name}
    pub async fn delete_video(&self, name: &str) -> Result<(), DetectError> {
        let url = self.endpoint_with_segment("delete-video/", name)?;
        self.delete(url).await?;
        tracing::info!(name, "Video deleted on device");
        Ok(())
    }
}
