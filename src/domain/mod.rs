//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `locale` - Localized canned text
//! - `description` - Validated organization description and its accessors
//! - `conversation` - Chat sessions, quick-reply dispatch and request assembly

pub mod conversation;
pub mod description;
pub mod foundation;
pub mod locale;
