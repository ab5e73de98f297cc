//! Conversation Engine - per-session chat orchestration.
//!
//! Appends visitor turns, answers quick replies from the dispatch table,
//! and otherwise asks the text generator with a prompt grounded in the
//! current description snapshot.
//!
//! # Ordering
//!
//! Each session has a send gate. An exchange holds it from the moment the
//! visitor turn is appended until the answer is appended, so later sends
//! queue behind it and the transcript keeps send order. Session state sits
//! behind a separate short-held lock, so snapshots stay readable (and report
//! `typing`) while a generation call is pending.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use uuid::Uuid;

use crate::domain::conversation::{
    detect_event_shortcut, dispatch, ChatSession, DispatchContext, Message, Panel, PromptBuilder,
    QuickReply, ResponseNormalizer,
};
use crate::domain::foundation::{DomainError, SessionId, StateMachine, Timestamp};
use crate::domain::locale::Phrases;
use crate::ports::{
    GenerationError, GenerationRequest, RequestMetadata, SafetySetting, SafetyThreshold,
    SamplingParams, SessionHandle, SessionStore, TextGenerator,
};

use super::description_store::DescriptionStore;

/// Longest visitor input accepted, in characters.
pub const MAX_INPUT_CHARS: usize = 250;

/// Errors surfaced to callers of the engine.
///
/// Generation failures are not errors here: they become the apology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Message cannot be empty")]
    EmptyInput,

    #[error("Message is too long: {actual} characters (max {max})")]
    InputTooLong { max: usize, actual: usize },

    #[error("Domain error: {0}")]
    Domain(String),
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        ChatError::Domain(err.to_string())
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub sampling: SamplingParams,
    pub safety: Vec<SafetySetting>,
    /// Upper bound on one generation call, retries included.
    pub generation_timeout: Duration,
    /// Route free-text event questions through the quick-reply table.
    pub event_shortcuts: bool,
    pub exemplars: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingParams::default(),
            safety: SafetySetting::all(SafetyThreshold::BlockNone),
            generation_timeout: Duration::from_secs(45),
            event_shortcuts: true,
            exemplars: true,
        }
    }
}

impl EngineConfig {
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_safety_threshold(mut self, threshold: SafetyThreshold) -> Self {
        self.safety = SafetySetting::all(threshold);
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_event_shortcuts(mut self, enabled: bool) -> Self {
        self.event_shortcuts = enabled;
        self
    }

    pub fn with_exemplars(mut self, enabled: bool) -> Self {
        self.exemplars = enabled;
        self
    }
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub transcript: Vec<Message>,
    pub panel: Panel,
    pub typing: bool,
}

/// Clears the typing flag when an exchange ends, however it ends.
struct TypingGuard<'a>(&'a SessionHandle);

impl<'a> TypingGuard<'a> {
    fn start(handle: &'a SessionHandle) -> Self {
        handle.set_typing(true);
        Self(handle)
    }
}

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_typing(false);
    }
}

/// Orchestrates chat sessions.
pub struct ConversationEngine {
    generator: Arc<dyn TextGenerator>,
    descriptions: Arc<DescriptionStore>,
    sessions: Arc<dyn SessionStore>,
    phrases: Phrases,
    prompts: PromptBuilder,
    normalizer: ResponseNormalizer,
    timezone: Tz,
    config: EngineConfig,
}

impl ConversationEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        descriptions: Arc<DescriptionStore>,
        sessions: Arc<dyn SessionStore>,
        phrases: Phrases,
        timezone: Tz,
        config: EngineConfig,
    ) -> Self {
        let prompts = PromptBuilder::new(phrases.clone(), timezone).with_exemplars(config.exemplars);
        let normalizer = ResponseNormalizer::new(phrases.organization());
        Self {
            generator,
            descriptions,
            sessions,
            phrases,
            prompts,
            normalizer,
            timezone,
            config,
        }
    }

    pub fn phrases(&self) -> &Phrases {
        &self.phrases
    }

    pub fn descriptions(&self) -> &Arc<DescriptionStore> {
        &self.descriptions
    }

    /// Opens a session, optionally with the two greeting messages.
    pub async fn create_session(&self, greet: bool) -> Result<SessionSnapshot, ChatError> {
        let mut session = ChatSession::new(SessionId::new());
        if greet {
            for greeting in self.phrases.greetings() {
                session.record_bot(&greeting, self.phrases.bot_name())?;
            }
        }
        let handle = Arc::new(SessionHandle::new(session));
        self.sessions.insert(handle.clone()).await;

        tracing::info!(session_id = %handle.id(), greet, "Chat session created");
        Ok(Self::snapshot_of(&handle).await)
    }

    pub async fn snapshot(&self, id: &SessionId) -> Result<SessionSnapshot, ChatError> {
        let handle = self.session(id).await?;
        Ok(Self::snapshot_of(&handle).await)
    }

    /// Empties the transcript and returns to the main menu.
    ///
    /// Waits for any in-flight exchange so its answer is not appended after
    /// the reset.
    pub async fn reset(&self, id: &SessionId) -> Result<SessionSnapshot, ChatError> {
        let handle = self.session(id).await?;
        let _gate = handle.acquire_send().await;
        handle.state().await.reset();

        tracing::info!(session_id = %id, "Chat session reset");
        Ok(Self::snapshot_of(&handle).await)
    }

    pub async fn delete(&self, id: &SessionId) -> Result<(), ChatError> {
        if self.sessions.remove(id).await {
            tracing::info!(session_id = %id, "Chat session deleted");
            Ok(())
        } else {
            Err(ChatError::SessionNotFound(*id))
        }
    }

    /// Handles free text and returns the answer shown to the visitor.
    ///
    /// Blank or over-long input is rejected before anything is appended.
    /// Generation failures append an error message and return the apology.
    pub async fn handle_user_input(&self, id: &SessionId, text: &str) -> Result<String, ChatError> {
        let text = validate_input(text)?;
        let handle = self.session(id).await?;
        let _gate = handle.acquire_send().await;

        if self.config.event_shortcuts {
            if let Some(reply) = detect_event_shortcut(text) {
                tracing::debug!(session_id = %id, token = %reply, "Free text routed to quick reply");
                let replies = self.apply_quick_reply(&handle, &reply, text).await?;
                return Ok(replies.into_iter().next().unwrap_or_default());
            }
        }

        let description = self.descriptions.snapshot().await;
        let now = Timestamp::now();

        let history = {
            let mut state = handle.state().await;
            let history = state.transcript().messages().to_vec();
            state.record_user(text)?;
            state.move_to(Panel::FollowUp).map_err(DomainError::from)?;
            history
        };

        let outcome = {
            let _typing = TypingGuard::start(&handle);
            match description {
                Some(description) => {
                    let turns = self.prompts.build(&description, &history, text, now);
                    let request = GenerationRequest::new(
                        turns,
                        RequestMetadata::new(*id, Uuid::new_v4().to_string()),
                    )
                    .with_sampling(self.config.sampling.clone())
                    .with_safety(self.config.safety.clone());
                    self.generate(request).await
                }
                None => Err(GenerationError::unavailable("Description not loaded")),
            }
        };

        let mut state = handle.state().await;
        match outcome {
            Ok(answer) => {
                state.record_bot(&answer, self.phrases.bot_name())?;
                Ok(answer)
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Generation failed, answering with apology");
                let apology = self.phrases.apology();
                state.record_error(&apology)?;
                Ok(apology)
            }
        }
    }

    /// Handles a quick-reply click and returns the bot messages it appended.
    ///
    /// Unrecognized tokens, and tokens for buttons the current panel does not
    /// show, are a no-op and return no messages.
    pub async fn handle_quick_reply(
        &self,
        id: &SessionId,
        button_id: &str,
    ) -> Result<Vec<String>, ChatError> {
        let handle = self.session(id).await?;
        let Some(reply) = QuickReply::parse(button_id) else {
            tracing::debug!(session_id = %id, button_id, "Ignoring unknown quick reply");
            return Ok(Vec::new());
        };

        let _gate = handle.acquire_send().await;
        let panel = handle.state().await.panel();
        if !reply.offered_on(panel) {
            tracing::debug!(
                session_id = %id,
                token = %reply,
                panel = ?panel,
                "Ignoring quick reply not offered on current panel"
            );
            return Ok(Vec::new());
        }

        let label = reply.label(self.phrases.language());
        self.apply_quick_reply(&handle, &reply, &label).await
    }

    async fn apply_quick_reply(
        &self,
        handle: &SessionHandle,
        reply: &QuickReply,
        user_text: &str,
    ) -> Result<Vec<String>, ChatError> {
        let description = self.descriptions.snapshot().await;
        let mut state = handle.state().await;

        let target = reply.target_panel();
        if !state.panel().can_transition_to(&target) {
            tracing::debug!(
                session_id = %handle.id(),
                token = %reply,
                panel = ?state.panel(),
                "Ignoring quick reply with disallowed transition"
            );
            return Ok(Vec::new());
        }

        let ctx = DispatchContext {
            description: description.as_deref(),
            phrases: &self.phrases,
            now: Timestamp::now(),
            timezone: self.timezone,
        };
        let outcome = dispatch(reply, &ctx);

        state.record_user(user_text)?;
        for text in &outcome.replies {
            state.record_bot(text, self.phrases.bot_name())?;
        }
        state
            .move_to(outcome.next_panel)
            .map_err(DomainError::from)?;

        Ok(outcome.replies)
    }

    /// Calls the generator under the configured timeout and normalizes the text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let limit = self.config.generation_timeout;
        let response = timeout(limit, self.generator.generate(request))
            .await
            .map_err(|_| GenerationError::Timeout {
                timeout_secs: limit.as_secs(),
            })??;

        let answer = self.normalizer.normalize(&response.text());
        if answer.is_empty() {
            return Err(GenerationError::malformed("Response contained no text"));
        }
        Ok(answer)
    }

    async fn session(&self, id: &SessionId) -> Result<Arc<SessionHandle>, ChatError> {
        self.sessions
            .get(id)
            .await
            .ok_or(ChatError::SessionNotFound(*id))
    }

    async fn snapshot_of(handle: &SessionHandle) -> SessionSnapshot {
        let state = handle.state().await;
        SessionSnapshot {
            session_id: *handle.id(),
            transcript: state.transcript().messages().to_vec(),
            panel: state.panel(),
            typing: handle.is_typing(),
        }
    }
}

fn validate_input(text: &str) -> Result<&str, ChatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyInput);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_INPUT_CHARS {
        return Err(ChatError::InputTooLong {
            max: MAX_INPUT_CHARS,
            actual,
        });
    }
    Ok(trimmed)
}
