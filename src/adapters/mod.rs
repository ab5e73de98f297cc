//! Adapters - Implementations of ports for external systems.
//!
//! - `ai` - Gemini text generator and a scripted mock
//! - `description` - File and HTTP description sources
//! - `session` - In-memory session store
//! - `http` - Chat REST API for the browser widget

pub mod ai;
pub mod description;
pub mod http;
pub mod session;

pub use ai::{GeminiConfig, GeminiProvider, MockTextGenerator};
pub use description::{FileDescriptionSource, HttpDescriptionSource};
pub use session::InMemorySessionStore;
