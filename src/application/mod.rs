//! Application layer - orchestration between the domain and the ports.
//!
//! - `DescriptionStore` - current description snapshot, loads with retry
//! - `DescriptionRefresher` - background reload on an interval
//! - `SessionSweeper` - background eviction of idle sessions
//! - `ConversationEngine` - per-session chat handling

mod conversation_engine;
mod description_refresher;
mod description_store;
mod session_sweeper;

pub use conversation_engine::{
    ChatError, ConversationEngine, EngineConfig, SessionSnapshot, MAX_INPUT_CHARS,
};
pub use description_refresher::{DescriptionRefresher, DEFAULT_REFRESH_INTERVAL};
pub use description_store::{DescriptionStore, DescriptionStoreConfig};
pub use session_sweeper::{SessionSweeper, DEFAULT_SESSION_IDLE_TTL, DEFAULT_SWEEP_INTERVAL};
