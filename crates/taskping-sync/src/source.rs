//! HTTP notification source.
//!
//! Talks to the mock notify endpoint. The contract requires no request
//! timeout; the client carries a generous one anyway so a hung endpoint
//! degrades into a normal retryable failure.

use std::time::Duration;

use async_trait::async_trait;

use taskping_core::defaults::SOURCE_TIMEOUT_SECS;
use taskping_core::{Error, NotificationCheckResult, NotificationSource, Result};

/// Notification source backed by the `GET /api/notify` endpoint.
pub struct HttpNotificationSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotificationSource {
    /// Create a source for the given base URL (scheme + host + port).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(SOURCE_TIMEOUT_SECS))
    }

    /// Create a source with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::from)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/notify", self.base_url)
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn check_pending(&self) -> Result<NotificationCheckResult> {
        let response = self.client.get(self.endpoint()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "notification check returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
