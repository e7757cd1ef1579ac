//! HTTP transport to counterpart instances.
//!
//! One request per call, no retries; retry policy belongs to the caller. Three outcomes are distinguished: acceptance (204), structured
//! rejection (validation error body), and transport failure.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::error;

use crate::error::{ShareError, ShareResult};
use crate::wire::{ErrorResponse, ShareEnvelope};

/// Sends an encrypted envelope to a remote instance.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// POST the envelope to `https://{host}{path}`.
    ///
    /// Returns `Ok(())` only on remote acceptance. A structured rejection
    /// surfaces as [`ShareError::Validation`], everything else as
    /// [`ShareError::Connection`] or [`ShareError::Processing`].
    async fn post(
        &self,
        host: &str,
        path: &str,
        auth_header: &str,
        envelope: &ShareEnvelope,
    ) -> ShareResult<()>;
}

/// `reqwest`-based transport client.
pub struct HttpTransportClient {
    client: reqwest::Client,
}

impl HttpTransportClient {
    /// Create a client with the given request timeout.
    pub fn new(request_timeout: Duration) -> ShareResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ShareError::Processing(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TransportClient for HttpTransportClient {
    async fn post(
        &self,
        host: &str,
        path: &str,
        auth_header: &str,
        envelope: &ShareEnvelope,
    ) -> ShareResult<()> {
        let url = format!("https://{host}{path}");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth_header)
            .json(envelope)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ShareError::Connection(format!("{host}: {e}"))
                } else {
                    ShareError::Processing(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(interpret_failure(status, &url, body))
    }
}

/// Map a non-204 response to an error. Any status may carry a structured
/// rejection body; only bodies that fail to parse fall back to the raw text.
fn interpret_failure(status: StatusCode, url: &str, body: String) -> ShareError {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(&body) {
        // Validation rejections are displayed per entity, not logged.
        return ShareError::validation(parsed.message, parsed.errors);
    }

    error!(%status, %url, "Share request failed");
    ShareError::Processing(format!("status {status}: {body}"))
}
