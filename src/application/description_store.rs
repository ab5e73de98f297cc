//! Description Store - the current organization description.
//!
//! Holds an immutable `Arc<Description>` snapshot. A load builds the whole
//! document first and only then swaps it in, so readers see either the old
//! document or the new one. A failed load keeps whatever was there.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::domain::description::{Description, DescriptionError, DescriptionFormat};
use crate::ports::DescriptionSource;

/// Configuration for loading the description.
#[derive(Debug, Clone)]
pub struct DescriptionStoreConfig {
    /// Explicit format; inferred from the source location when `None`.
    pub format: Option<DescriptionFormat>,

    /// Attempts per `load_with_retry` call, including the first.
    pub max_attempts: u32,

    pub initial_backoff: Duration,

    pub max_backoff: Duration,
}

impl Default for DescriptionStoreConfig {
    fn default() -> Self {
        Self {
            format: None,
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl DescriptionStoreConfig {
    pub fn with_format(mut self, format: DescriptionFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }
}

/// Current description snapshot plus the source it is loaded from.
pub struct DescriptionStore {
    source: Arc<dyn DescriptionSource>,
    format: DescriptionFormat,
    config: DescriptionStoreConfig,
    current: RwLock<Option<Arc<Description>>>,
}

impl DescriptionStore {
    pub fn new(source: Arc<dyn DescriptionSource>) -> Self {
        Self::with_config(source, DescriptionStoreConfig::default())
    }

    pub fn with_config(source: Arc<dyn DescriptionSource>, config: DescriptionStoreConfig) -> Self {
        let format = config
            .format
            .unwrap_or_else(|| DescriptionFormat::infer(source.location()));
        Self {
            source,
            format,
            config,
            current: RwLock::new(None),
        }
    }

    pub fn format(&self) -> DescriptionFormat {
        self.format
    }

    pub fn location(&self) -> &str {
        self.source.location()
    }

    /// Fetches, parses and publishes a new snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load(&self) -> Result<Arc<Description>, DescriptionError> {
        let result = self
            .source
            .fetch()
            .await
            .and_then(|body| Description::parse(&body, self.format));

        match result {
            Ok(description) => {
                let description = Arc::new(description);
                *self.current.write().await = Some(description.clone());
                tracing::info!(
                    location = %self.source.location(),
                    format = ?self.format,
                    services = description.list_services().len(),
                    events = description.events().len(),
                    "Description loaded"
                );
                Ok(description)
            }
            Err(e) => {
                let kept_previous = self.is_loaded().await;
                tracing::warn!(
                    location = %self.source.location(),
                    error = %e,
                    kept_previous,
                    "Description load failed"
                );
                Err(e)
            }
        }
    }

    /// Loads with bounded retries on transient failures.
    ///
    /// Backoff doubles after each attempt, capped at `max_backoff`.
    pub async fn load_with_retry(&self) -> Result<Arc<Description>, DescriptionError> {
        let attempts = self.config.max_attempts.max(1);
        let mut backoff = self.config.initial_backoff;
        let mut attempt = 1;

        loop {
            match self.load().await {
                Ok(description) => return Ok(description),
                Err(e) if e.is_transient() && attempt < attempts => {
                    tracing::debug!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "Retrying description load"
                    );
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(self.config.max_backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// The current snapshot, if any load has succeeded.
    pub async fn snapshot(&self) -> Option<Arc<Description>> {
        self.current.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }
}
