//! HTTP description source.
//!
//! Fetches the description with a plain GET; the body replaces the previous
//! document wholesale.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::description::DescriptionError;
use crate::ports::DescriptionSource;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Reads the description from a URL.
#[derive(Debug, Clone)]
pub struct HttpDescriptionSource {
    url: String,
    client: Client,
}

impl HttpDescriptionSource {
    pub fn new(url: impl Into<String>) -> Result<Self, DescriptionError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, DescriptionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DescriptionError::Unavailable(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl DescriptionSource for HttpDescriptionSource {
    async fn fetch(&self) -> Result<String, DescriptionError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DescriptionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DescriptionError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| DescriptionError::Unavailable(format!("Failed to read body: {}", e)))
    }

    fn location(&self) -> &str {
        &self.url
    }
}
