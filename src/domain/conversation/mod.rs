//! Conversation domain module.
//!
//! Chat sessions, their append-only transcripts, the quick-reply panel state
//! machine and the pure pieces of answering: dispatch of quick replies,
//! free-text shortcuts, request assembly and reply normalization.

mod intent;
mod message;
mod normalizer;
mod panel;
mod prompt;
mod quick_reply;
mod session;
mod transcript;

pub use intent::detect_event_shortcut;
pub use message::{Message, Role};
pub use normalizer::{ResponseNormalizer, MAX_REPLY_CHARS};
pub use panel::Panel;
pub use prompt::{Exemplar, PromptBuilder, PromptTurn, TurnRole};
pub use quick_reply::{dispatch, Dispatch, DispatchContext, QuickReply, SOCIALS_METHOD};
pub use session::ChatSession;
pub use transcript::Transcript;
