//! reqwest implementation of [`ScanBackend`]

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::error::{BackendError, BackendResult};
use super::traits::ScanBackend;
use crate::cart::{Mode, ScanPayload};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const START_PATH: &str = "start-video-feed";
const STOP_PATH: &str = "stop-video-feed";
const POLL_PATH: &str = "get-product";
const MODE_PATH: &str = "set-mode";
const CHECKOUT_PATH: &str = "checkout";

#[derive(Debug, Serialize)]
struct ModeRequest {
    mode: Mode,
}

/// HTTP client for the vision backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str, request_timeout: Duration) -> BackendResult<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(BackendError::Configuration {
                message: format!(
                    "Invalid backend URL scheme. Only http:// and https:// are supported: {}",
                    base_url
                ),
            });
        }

        // No client-wide timeout: the start call stays open for as long as the
        // backend's detection loop runs. Other calls set `request_timeout` per request.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BackendError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post(&self, path: &str, operation: &str) -> BackendResult<reqwest::Response> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::unreachable(operation, e))?;
        ensure_success(operation, response)
    }
}

fn ensure_success(operation: &str, response: reqwest::Response) -> BackendResult<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status {
            operation: operation.to_string(),
            status: response.status().as_u16(),
        })
    }
}

#[async_trait]
impl ScanBackend for HttpBackend {
    async fn start_scanning(&self) -> BackendResult<()> {
        let operation = "start scanning";
        let response = self
            .client
            .post(self.url(START_PATH))
            .send()
            .await
            .map_err(|e| BackendError::unreachable(operation, e))?;
        ensure_success(operation, response)?;
        Ok(())
    }

    async fn stop_scanning(&self) -> BackendResult<()> {
        self.post(STOP_PATH, "stop scanning").await?;
        Ok(())
    }

    async fn poll_scan(&self) -> BackendResult<Option<ScanPayload>> {
        let operation = "poll for scan";
        let response = self
            .client
            .get(self.url(POLL_PATH))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::unreachable(operation, e))?;

        if !response.status().is_success() {
            log::trace!("No product detected yet (HTTP {})", response.status().as_u16());
            return Ok(None);
        }

        let payload = response
            .json::<ScanPayload>()
            .await
            .map_err(|e| BackendError::decode(operation, e))?;
        Ok(Some(payload))
    }

    async fn set_mode(&self, mode: Mode) -> BackendResult<()> {
        let operation = "set mode";
        let response = self
            .client
            .post(self.url(MODE_PATH))
            .timeout(self.request_timeout)
            .json(&ModeRequest { mode })
            .send()
            .await
            .map_err(|e| BackendError::unreachable(operation, e))?;
        ensure_success(operation, response)?;
        Ok(())
    }

    async fn checkout(&self) -> BackendResult<Vec<u8>> {
        let operation = "checkout";
        let response = self.post(CHECKOUT_PATH, operation).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::decode(operation, e))?;
        Ok(bytes.to_vec())
    }
}
