use std::time::Duration;

use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::*;

impl DetectApiClient {
    /// Client for `http://{host}:{port}/`.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, DetectError> {
        let base = Url::parse(&format!("http://{host}:{port}/"))?;
        Self::with_base_url(base, timeout)
    }

    /// Client for an explicit base URL (must end at the service root).
    pub fn with_base_url(base: Url, timeout: Duration) -> Result<Self, DetectError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// Resolve `path` below the base URL.
    pub(super) fn endpoint(&self, path: &str) -> Result<Url, DetectError> {
        Ok(self.base.join(path)?)
    }

    /// Resolve `prefix/{segment}` with `segment` percent-encoded as one path segment.
    pub(super) fn endpoint_with_segment(
        &self,
        prefix: &str,
        segment: &str,
    ) -> Result<Url, DetectError> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Execute a GET request and decode the JSON body.
    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DetectError> {
        let resp = self.http.get(url.clone()).send().await?;
        let body = check_status(resp, &url).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Execute a GET request and return the raw body bytes.
    pub(super) async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, DetectError> {
        let resp = self.http.get(url.clone()).send().await?;
        let bytes = check_status(resp, &url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Execute a POST request with a pretty-printed JSON body.
    pub(super) async fn post_pretty_json(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<(), DetectError> {
        let payload = serde_json::to_string_pretty(body)?;
        let resp = self
            .http
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        check_status(resp, &url).await?;
        Ok(())
    }

    /// Execute a DELETE request.
    pub(super) async fn delete(&self, url: Url) -> Result<(), DetectError> {
        let resp = self.http.delete(url.clone()).send().await?;
        check_status(resp, &url).await?;
        Ok(())
    }
}

async fn check_status(resp: Response, url: &Url) -> Result<Response, DetectError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp.text().await.unwrap_or_default();
    tracing::debug!(url = %url, status = status.as_u16(), "Device request failed");
    Err(DetectError::ApiError {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DetectApiClient {
        DetectApiClient::new("192.168.1.20", 9010, DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn endpoint_joins_below_base() {
        let url = client().endpoint("detection_res").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.20:9010/detection_res");
    }

    #[test]
    fn endpoint_with_segment_percent_encodes_names() {
        let url = client()
            .endpoint_with_segment("download-video/", "layer 3/best#1.mp4")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://192.168.1.20:9010/download-video/layer%203%2Fbest%231.mp4"
        );
    }

    #[test]
    fn invalid_host_is_rejected() {
        assert!(DetectApiClient::new("bad host", 9010, DEFAULT_TIMEOUT).is_err());
    }
}
