//! Text Generator Adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Gemini `generateContent` API with bounded retries
//! - `MockTextGenerator` - Scripted generator for testing

mod gemini_provider;
mod mock_generator;

pub use gemini_provider::{
    extract_response, map_status, with_retries, GeminiConfig, GeminiProvider,
    GenerateContentRequest, GenerateContentResponse, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use mock_generator::{MockTextGenerator, ScriptedReply};
