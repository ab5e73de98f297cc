//! Text Generator Port - Interface for the hosted text-generation endpoint.
//!
//! The conversation engine assembles turns and sampling settings; an adapter
//! translates them to the provider's wire format and back.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoGenerator;
//!
//! #[async_trait]
//! impl TextGenerator for EchoGenerator {
//!     async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
//!         let last = request.turns.last().map(|t| t.text.clone()).unwrap_or_default();
//!         Ok(GenerationResponse::from_text(last, "echo"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::PromptTurn;
use crate::domain::foundation::SessionId;

/// Port for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply for the given turns.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError>;

    /// Provider name and model, for logging.
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for one generated reply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Alternating user/model turns, ending with the user.
    pub turns: Vec<PromptTurn>,
    pub sampling: SamplingParams,
    pub safety: Vec<SafetySetting>,
    pub metadata: RequestMetadata,
}

impl GenerationRequest {
    pub fn new(turns: Vec<PromptTurn>, metadata: RequestMetadata) -> Self {
        Self {
            turns,
            sampling: SamplingParams::default(),
            safety: SafetySetting::all(SafetyThreshold::BlockNone),
            metadata,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_safety(mut self, safety: Vec<SafetySetting>) -> Self {
        self.safety = safety;
        self
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub session_id: SessionId,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(session_id: SessionId, trace_id: impl Into<String>) -> Self {
        Self {
            session_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            top_k: 64,
            max_output_tokens: 1000,
            response_mime_type: "text/plain".to_string(),
        }
    }
}

/// Content-safety categories the endpoint filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// Blocking threshold for one harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyThreshold {
    #[default]
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: SafetyThreshold,
}

impl SafetySetting {
    /// One setting per harm category, all at `threshold`.
    pub fn all(threshold: SafetyThreshold) -> Vec<SafetySetting> {
        HarmCategory::ALL
            .iter()
            .map(|&category| SafetySetting { category, threshold })
            .collect()
    }
}

/// A generated reply.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    /// Text parts of the first candidate, in order.
    pub parts: Vec<String>,
    pub model: String,
    pub finish_reason: Option<String>,
}

impl GenerationResponse {
    pub fn from_text(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
            model: model.into(),
            finish_reason: None,
        }
    }

    /// Parts joined with a single space.
    pub fn text(&self) -> String {
        self.parts.join(" ")
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Text generation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Endpoint returned a 5xx status.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// Rate limited by the endpoint (429).
    #[error("rate limited")]
    RateLimited,

    /// API key rejected (401/403).
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Endpoint rejected the request (other 4xx).
    #[error("invalid request ({status}): {message}")]
    InvalidRequest { status: u16, message: String },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response missing the expected fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Prompt or reply blocked by content safety.
    #[error("content blocked: {reason}")]
    Blocked { reason: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl GenerationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked {
            reason: reason.into(),
        }
    }

    /// Transient failures: 5xx, network and timeouts. No 4xx is retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}
