//! Description domain module.
//!
//! The organization description grounding every answer: a validated
//! document with lookup accessors, plus the escaping applied before any text
//! is embedded into a generation request.

mod document;
mod escape;
mod keyed;

pub use document::{
    parse_event_date, About, Contacts, Description, DescriptionFormat, Event, EventEntry,
    Service, TeamMember,
};
pub use escape::escape_for_prompt;
pub use keyed::Keyed;

use thiserror::Error;

/// Errors raised while fetching or validating a description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionError {
    #[error("Description source unavailable: {0}")]
    Unavailable(String),

    #[error("Description source returned status {status}")]
    Status { status: u16 },

    #[error("Description is empty")]
    Empty,

    #[error("Description is not valid JSON: {0}")]
    Parse(String),

    #[error("Description does not match the expected schema: {0}")]
    Schema(String),
}

impl DescriptionError {
    /// Source-side failures worth retrying; bad documents are not.
    pub fn is_transient(&self) -> bool {
        match self {
            DescriptionError::Unavailable(_) => true,
            DescriptionError::Status { status } => *status >= 500,
            DescriptionError::Empty
            | DescriptionError::Parse(_)
            | DescriptionError::Schema(_) => false,
        }
    }
}
