//! Chat session aggregate.
//!
//! Owns one visitor's transcript and the panel currently offered. All state
//! changes go through these methods so the transcript stays append-only and
//! the panel only moves along valid transitions.

use super::message::Message;
use super::panel::Panel;
use super::transcript::Transcript;
use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, StateMachine, Timestamp, ValidationError,
};

/// One visitor's conversation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    id: SessionId,
    transcript: Transcript,
    panel: Panel,
    created_at: Timestamp,
}

impl ChatSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            transcript: Transcript::new(),
            panel: Panel::MainMenu,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Appends a visitor message.
    pub fn record_user(&mut self, text: &str) -> Result<&Message, DomainError> {
        self.push(Message::user(text)?)
    }

    /// Appends a bot message labelled with the bot name.
    pub fn record_bot(&mut self, text: &str, label: &str) -> Result<&Message, DomainError> {
        self.push(Message::bot(text, label)?)
    }

    /// Appends a failure notice in place of a bot answer.
    pub fn record_error(&mut self, text: &str) -> Result<&Message, DomainError> {
        self.push(Message::error(text)?)
    }

    /// Moves to `target` if the panel state machine allows it.
    pub fn move_to(&mut self, target: Panel) -> Result<Panel, ValidationError> {
        self.panel = self.panel.transition_to(target)?;
        Ok(self.panel)
    }

    /// Empties the transcript and returns to the main menu.
    pub fn reset(&mut self) {
        self.transcript = Transcript::new();
        self.panel = Panel::MainMenu;
    }

    fn push(&mut self, message: Message) -> Result<&Message, DomainError> {
        self.transcript.append(message);
        self.transcript
            .last()
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "Append did not record a message"))
    }
}
