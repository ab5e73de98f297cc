//! Mock Text Generator for testing.
//!
//! Provides a configurable mock implementation of the TextGenerator port,
//! allowing tests to run without calling the hosted endpoint.
//!
//! # Features
//!
//! - Scripted replies, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for failure handling
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_reply("Bonjour!")
//!     .with_error(GenerationError::unavailable("503"));
//!
//! let response = generator.generate(request).await?;
//! assert_eq!(response.text(), "Bonjour!");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GenerationError, GenerationRequest, GenerationResponse, ProviderInfo, TextGenerator};

/// A scripted outcome.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Text parts of a successful response.
    Parts(Vec<String>),
    Error(GenerationError),
}

/// Mock text generator.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a single-part reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_parts(vec![text.into()])
    }

    /// Queues a multi-part reply.
    pub fn with_parts(self, parts: Vec<String>) -> Self {
        lock(&self.replies).push_back(ScriptedReply::Parts(parts));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        lock(&self.replies).push_back(ScriptedReply::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        lock(&self.calls).clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| ScriptedReply::Parts(vec!["Mock response".to_string()]))
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            ScriptedReply::Parts(parts) => Ok(GenerationResponse {
                parts,
                model: "mock-model".to_string(),
                finish_reason: Some("STOP".to_string()),
            }),
            ScriptedReply::Error(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model")
    }
}
