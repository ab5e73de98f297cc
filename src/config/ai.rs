//! Text generation configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::{SafetyThreshold, SamplingParams};

/// Generation endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Gemini API key
    pub api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Endpoint root; `/{model}:generateContent` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, doubled afterwards
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound on a whole exchange, retries included
    #[serde(default = "default_exchange_timeout")]
    pub exchange_timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_response_mime_type")]
    pub response_mime_type: String,

    /// Applied to all four harm categories
    #[serde(default)]
    pub safety_threshold: SafetyThreshold,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn exchange_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange_timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
            response_mime_type: self.response_mime_type.clone(),
        }
    }

    /// Validate generation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("STARBOT__AI__API_KEY"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::EmptyValue("ai.model"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("ai.base_url"));
        }
        if self.timeout_secs == 0 || self.exchange_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidSampling("temperature"));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ValidationError::InvalidSampling("top_p"));
        }
        if self.top_k == 0 {
            return Err(ValidationError::InvalidSampling("top_k"));
        }
        if self.max_output_tokens == 0 {
            return Err(ValidationError::InvalidSampling("max_output_tokens"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            exchange_timeout_secs: default_exchange_timeout(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            response_mime_type: default_response_mime_type(),
            safety_threshold: SafetyThreshold::default(),
        }
    }
}

fn default_model() -> String {
    crate::adapters::ai::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    crate::adapters::ai::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_exchange_timeout() -> u64 {
    90
}

fn default_temperature() -> f32 {
    SamplingParams::default().temperature
}

fn default_top_p() -> f32 {
    SamplingParams::default().top_p
}

fn default_top_k() -> u32 {
    SamplingParams::default().top_k
}

fn default_max_output_tokens() -> u32 {
    SamplingParams::default().max_output_tokens
}

fn default_response_mime_type() -> String {
    SamplingParams::default().response_mime_type
}
