//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - Hosted text-generation endpoint
//! - `DescriptionSource` - Where the organization description is read from
//! - `SessionStore` - Registry of live chat sessions

mod description_source;
mod session_store;
mod text_generator;

pub use description_source::DescriptionSource;
pub use session_store::{SessionHandle, SessionStore};
pub use text_generator::{
    GenerationError, GenerationRequest, GenerationResponse, HarmCategory, ProviderInfo,
    RequestMetadata, SafetySetting, SafetyThreshold, SamplingParams, TextGenerator,
};
