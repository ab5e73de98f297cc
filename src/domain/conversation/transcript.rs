//! Append-only transcript.

use super::message::Message;
use serde::Serialize;

/// Ordered messages of one session.
///
/// There is no removal or in-place edit API; a reset replaces the whole
/// transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages appended after the first `from` ones.
    pub fn since(&self, from: usize) -> &[Message] {
        self.messages.get(from..).unwrap_or(&[])
    }
}
