//! Description source configuration

use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::DescriptionStoreConfig;
use crate::domain::description::DescriptionFormat;

/// Where the organization description comes from and how often it reloads
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionConfig {
    /// File path or `http(s)://` URL
    #[serde(default = "default_source")]
    pub source: String,

    /// `json` or `text`; inferred from the source extension when unset
    pub format: Option<DescriptionFormat>,

    /// Seconds between background reloads; 0 disables reloading
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_max_load_attempts")]
    pub max_load_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// IANA time zone the organization's dates are in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl DescriptionConfig {
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    pub fn timezone(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn store_config(&self) -> DescriptionStoreConfig {
        let mut config = DescriptionStoreConfig::default()
            .with_max_attempts(self.max_load_attempts)
            .with_initial_backoff(Duration::from_millis(self.initial_backoff_ms));
        if let Some(format) = self.format {
            config = config.with_format(format);
        }
        config
    }

    /// Validate description configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source.trim().is_empty() {
            return Err(ValidationError::EmptyValue("description.source"));
        }
        if self.max_load_attempts == 0 {
            return Err(ValidationError::InvalidRetryPolicy);
        }
        self.timezone()?;
        Ok(())
    }
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            format: None,
            refresh_interval_secs: default_refresh_interval(),
            max_load_attempts: default_max_load_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            timezone: default_timezone(),
        }
    }
}

fn default_source() -> String {
    "data/description.json".to_string()
}

fn default_refresh_interval() -> u64 {
    3 * 60 * 60
}

fn default_max_load_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}
