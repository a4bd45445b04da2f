use super::*;

impl DetectApiClient {
    /// GET /version
    pub async fn get_version(&self) -> Result<VersionInfo, DetectError> {
        let url = self.endpoint("version")?;
        self.get_json(url).await
    }

    /// GET /detection_res – current print and detection counters.
    pub async fn get_detection_result(&self) -> Result<DetectionResult, DetectError> {
        let url = self.endpoint("detection_res")?;
        self.get_json(url).await
    }

    /// GET /capture – most recent camera frame.
    pub async fn capture(&self) -> Result<CaptureFrame, DetectError> {
        let url = self.endpoint("capture")?;
        self.get_json(url).await
    }

    /// GET /history_frames?type={kind}
    pub async fn get_history_frames(
        &self,
        kind: HistoryKind,
    ) -> Result<Vec<HistoryFrame>, DetectError> {
        let mut url = self.endpoint("history_frames")?;
        url.query_pairs_mut().append_pair("type", kind.as_str());
        self.get_json(url).await
    }
}
