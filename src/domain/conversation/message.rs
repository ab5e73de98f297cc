//! Message entity for chat transcripts.
//!
//! Messages are immutable records of one exchange step: what the visitor typed
//! or clicked, what the bot answered, or a failure notice.

use crate::domain::foundation::{DomainError, MessageId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Visitor input, typed or clicked.
    User,
    /// Bot answer, canned or generated.
    Bot,
    /// Instructions; never rendered and never sent as history.
    System,
    /// Failure notice shown in place of a bot answer.
    Error,
}

impl Role {
    /// Returns true if this role is replayed as conversation history.
    pub fn is_history(&self) -> bool {
        matches!(self, Self::User | Self::Bot)
    }
}

/// An immutable message within a transcript.
///
/// # Invariants
///
/// - `text` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message with the given role and text.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if text is empty
    pub fn new(role: Role, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        Self::validate_text(&text)?;

        Ok(Self {
            id: MessageId::new(),
            role,
            text,
            label: None,
            created_at: Timestamp::now(),
        })
    }

    pub fn user(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::User, text)
    }

    /// Creates a bot message carrying the bot's display name.
    pub fn bot(text: impl Into<String>, label: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self::new(Role::Bot, text)?.with_label(label))
    }

    pub fn error(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::Error, text)
    }

    pub fn system(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::System, text)
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }

    fn validate_text(text: &str) -> Result<(), DomainError> {
        if text.trim().is_empty() {
            return Err(ValidationError::empty("text").into());
        }
        Ok(())
    }
}
