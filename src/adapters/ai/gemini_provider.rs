//! Gemini Provider - Implementation of TextGenerator for the `generateContent` API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-pro-latest")
//!     .with_max_retries(2);
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! # Retries
//!
//! 5xx responses, connection failures and timeouts are retried with
//! exponential backoff. No 4xx response is retried.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::{PromptTurn, TurnRole};
use crate::ports::{
    GenerationError, GenerationRequest, GenerationResponse, ProviderInfo, SafetySetting,
    TextGenerator,
};

/// Public endpoint root; the model and method are appended.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each following one.
    pub initial_backoff: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
        }
    }

    /// Builds a configuration from an already-secret key.
    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            ..Self::new(String::new())
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini `generateContent` client.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a provider with its own HTTP client.
    ///
    /// # Errors
    /// - `Network` if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<Response, GenerationError> {
        self.client
            .post(self.endpoint_url())
            .query(&[("key", self.config.api_key())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })
    }

    async fn attempt(&self, body: &GenerateContentRequest) -> Result<GenerationResponse, GenerationError> {
        let response = self.send_request(body).await?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), &error_body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::malformed(format!("Failed to parse response: {}", e)))?;

        extract_response(parsed, &self.config.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
        let body = GenerateContentRequest::from_request(&request);
        let trace_id = request.metadata.trace_id.as_str();

        with_retries(self.config.max_retries, self.config.initial_backoff, |attempt| {
            if attempt > 0 {
                tracing::debug!(trace_id, attempt, "Retrying generation request");
            }
            self.attempt(&body)
        })
        .await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or
/// `max_retries` retries are spent. The delay doubles after each retry.
pub async fn with_retries<T, F, Fut>(
    max_retries: u32,
    initial_backoff: Duration,
    mut op: F,
) -> Result<T, GenerationError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_retries => {
                let delay = initial_backoff.saturating_mul(1 << attempt.min(16));
                tracing::warn!(error = %err, attempt, delay_ms = delay.as_millis() as u64, "Transient generation failure");
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Maps a non-2xx status to an error.
pub fn map_status(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|w| {
            let msg = w.error.message?;
            Some(match w.error.status {
                Some(s) if !s.is_empty() => format!("{}: {}", s, msg),
                _ => msg,
            })
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => GenerationError::AuthenticationFailed,
        429 => GenerationError::RateLimited,
        400..=499 => GenerationError::InvalidRequest { status, message },
        500..=599 => GenerationError::unavailable(format!("Server error {}: {}", status, message)),
        _ => GenerationError::network(format!("Unexpected status {}: {}", status, message)),
    }
}

/// Extracts text parts of the first candidate.
pub fn extract_response(
    response: GenerateContentResponse,
    model: &str,
) -> Result<GenerationResponse, GenerationError> {
    let candidates = match response.candidates {
        Some(candidates) if !candidates.is_empty() => candidates,
        _ => {
            return Err(match response.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => GenerationError::blocked(reason),
                None => GenerationError::malformed("No candidates in response"),
            })
        }
    };

    let candidate = candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::malformed("No candidates in response"))?;

    let parts: Vec<String> = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if parts.iter().all(|p| p.trim().is_empty()) {
        return Err(match candidate.finish_reason.as_deref() {
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                GenerationError::blocked(candidate.finish_reason.unwrap_or_default())
            }
            _ => GenerationError::malformed("Candidate has no text parts"),
        });
    }

    Ok(GenerationResponse {
        parts,
        model: model.to_string(),
        finish_reason: candidate.finish_reason,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            contents: request.turns.iter().map(Content::from_turn).collect(),
            generation_config: GenerationConfig {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
                top_k: request.sampling.top_k,
                max_output_tokens: request.sampling.max_output_tokens,
                response_mime_type: request.sampling.response_mime_type.clone(),
            },
            safety_settings: request.safety.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn from_turn(turn: &PromptTurn) -> Self {
        Self {
            role: match turn.role {
                TurnRole::User => "user",
                TurnRole::Model => "model",
            },
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{RequestMetadata, SafetyThreshold, SamplingParams};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    mod config {
        use super::*;

        #[test]
        fn builder_works() {
            let config = GeminiConfig::new("test-key")
                .with_model("gemini-1.5-flash")
                .with_base_url("http://localhost:9999/models/")
                .with_timeout(Duration::from_secs(5))
                .with_max_retries(4);

            assert_eq!(config.model, "gemini-1.5-flash");
            assert_eq!(config.timeout, Duration::from_secs(5));
            assert_eq!(config.max_retries, 4);
            assert_eq!(config.api_key(), "test-key");
        }

        #[test]
        fn debug_output_hides_key() {
            let config = GeminiConfig::new("super-secret");
            assert!(!format!("{:?}", config).contains("super-secret"));
        }

        #[test]
        fn endpoint_url_appends_model_and_method() {
            let provider = GeminiProvider::new(
                GeminiConfig::new("k").with_base_url("http://localhost:9999/models/"),
            )
            .unwrap();
            assert_eq!(
                provider.endpoint_url(),
                "http://localhost:9999/models/gemini-1.5-pro-latest:generateContent"
            );
        }
    }

    mod wire_format {
        use super::*;

        #[test]
        fn request_uses_camel_case_fields_and_model_role() {
            let request = GenerationRequest::new(
                vec![PromptTurn::user("Bonjour"), PromptTurn::model("Salut"), PromptTurn::user("Ça va?")],
                RequestMetadata::new(SessionId::new(), "t"),
            )
            .with_sampling(SamplingParams {
                temperature: 0.2,
                ..SamplingParams::default()
            });

            let json = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();
            assert_eq!(json["contents"][1]["role"], "model");
            assert_eq!(json["contents"][2]["parts"][0]["text"], "Ça va?");
            assert_eq!(json["generationConfig"]["topK"], 64);
            assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
            assert_eq!(json["generationConfig"]["responseMimeType"], "text/plain");
            assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
            assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_NONE");
        }

        #[test]
        fn request_carries_configured_threshold() {
            let request = GenerationRequest::new(vec![], RequestMetadata::new(SessionId::new(), "t"))
                .with_safety(SafetySetting::all(SafetyThreshold::BlockMediumAndAbove));
            let json = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();
            assert_eq!(json["safetySettings"][3]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
        }
    }

    mod prompt_wire_round_trip {
        use super::*;
        use crate::domain::conversation::{Message, PromptBuilder};
        use crate::domain::description::{escape_for_prompt, Description};
        use crate::domain::foundation::Timestamp;
        use crate::domain::locale::{Language, Phrases};
        use proptest::prelude::*;

        fn arbitrary_description(mission: &str, member: &str, service: &str) -> Description {
            let doc = serde_json::json!({
                "about": {"mission": mission, "team": [{"name": member, "role": service}]},
                "services": {"s": {"type": service, "description": mission, "price": member, "emoji": "💼"}},
                "contacts": {"address": member},
            });
            Description::from_json(&doc.to_string()).unwrap()
        }

        proptest! {
            #[test]
            fn question_survives_serialization_escaped(
                mission in ".*",
                member in ".*",
                service in ".*",
                earlier in ".*\\S.*",
                input in any::<String>(),
                exemplars in any::<bool>(),
            ) {
                let description = arbitrary_description(&mission, &member, &service);
                let history = vec![
                    Message::user(earlier.clone()).unwrap(),
                    Message::bot("Réponse", "StarBot").unwrap(),
                ];
                let builder = PromptBuilder::new(
                    Phrases::new(Language::Fr, "Startop", "StarBot"),
                    chrono_tz::America::New_York,
                )
                .with_exemplars(exemplars);
                let turns = builder.build(&description, &history, &input, Timestamp::now());

                let request = GenerationRequest::new(turns, RequestMetadata::new(SessionId::new(), "t"));
                let wire = serde_json::to_string(&GenerateContentRequest::from_request(&request)).unwrap();
                let reparsed: serde_json::Value = serde_json::from_str(&wire).unwrap();

                let contents = reparsed["contents"].as_array().unwrap();
                let last = contents.last().unwrap();
                prop_assert_eq!(last["role"].as_str(), Some("user"));
                let expected = escape_for_prompt(&input);
                prop_assert_eq!(last["parts"][0]["text"].as_str(), Some(expected.as_str()));
            }
        }
    }

    mod responses {
        use super::*;

        #[test]
        fn joins_text_parts_with_space() {
            let response = parse(
                r#"{"candidates":[{"content":{"parts":[{"text":"Bonjour"},{"text":"à tous"}]},"finishReason":"STOP"}]}"#,
            );
            let extracted = extract_response(response, "gemini").unwrap();
            assert_eq!(extracted.text(), "Bonjour à tous");
            assert_eq!(extracted.finish_reason.as_deref(), Some("STOP"));
        }

        #[test]
        fn missing_candidates_is_malformed() {
            let err = extract_response(parse(r#"{}"#), "gemini").unwrap_err();
            assert!(matches!(err, GenerationError::MalformedResponse(_)));
        }

        #[test]
        fn candidate_without_content_is_malformed() {
            let err = extract_response(parse(r#"{"candidates":[{}]}"#), "gemini").unwrap_err();
            assert!(matches!(err, GenerationError::MalformedResponse(_)));
        }

        #[test]
        fn prompt_block_is_reported() {
            let err = extract_response(
                parse(r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#),
                "gemini",
            )
            .unwrap_err();
            assert_eq!(err, GenerationError::blocked("SAFETY"));
        }

        #[test]
        fn safety_finish_without_text_is_blocked() {
            let err = extract_response(
                parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
                "gemini",
            )
            .unwrap_err();
            assert!(matches!(err, GenerationError::Blocked { .. }));
        }
    }

    mod status_mapping {
        use super::*;

        #[test]
        fn server_errors_are_retryable() {
            let err = map_status(503, r#"{"error":{"message":"overloaded","status":"UNAVAILABLE"}}"#);
            assert!(err.is_retryable());
            assert!(err.to_string().contains("UNAVAILABLE: overloaded"));
        }

        #[test]
        fn client_errors_are_not_retryable() {
            for status in [400, 401, 403, 404, 429] {
                assert!(!map_status(status, "").is_retryable(), "status {}", status);
            }
        }

        #[test]
        fn auth_and_rate_limit_have_dedicated_variants() {
            assert_eq!(map_status(401, ""), GenerationError::AuthenticationFailed);
            assert_eq!(map_status(429, ""), GenerationError::RateLimited);
        }

        #[test]
        fn plain_body_is_kept_as_message() {
            assert_eq!(
                map_status(400, "bad things"),
                GenerationError::InvalidRequest {
                    status: 400,
                    message: "bad things".to_string()
                }
            );
        }
    }

    mod retries {
        use super::*;

        #[tokio::test]
        async fn retries_transient_failures_until_success() {
            let calls = AtomicU32::new(0);
            let result = with_retries(3, Duration::ZERO, |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(GenerationError::unavailable("503"))
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;

            assert_eq!(result, Ok("ok"));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn stops_after_max_retries() {
            let calls = AtomicU32::new(0);
            let result: Result<(), _> = with_retries(2, Duration::ZERO, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GenerationError::network("reset")) }
            })
            .await;

            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn never_retries_client_errors() {
            let calls = AtomicU32::new(0);
            let result: Result<(), _> = with_retries(5, Duration::ZERO, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GenerationError::RateLimited) }
            })
            .await;

            assert_eq!(result, Err(GenerationError::RateLimited));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
