//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.
//! Field names are camelCase for the browser widget.

use serde::{Deserialize, Serialize};

use crate::application::SessionSnapshot;
use crate::domain::conversation::{Message, Panel, Role};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Free-text input from the visitor.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// A quick-reply button click.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReplyRequest {
    pub button_id: String,
}

/// Query parameters for the description endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DescriptionQuery {
    #[serde(default)]
    pub category: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One transcript entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: message.role(),
            text: message.text().to_string(),
            label: message.label().map(str::to_string),
            created_at: message.created_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Session view returned by every session endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub transcript: Vec<MessageResponse>,
    pub panel: Panel,
    /// Whether the panel offers a way back to the main menu.
    pub can_return: bool,
    pub typing: bool,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id.to_string(),
            transcript: snapshot.transcript.iter().map(MessageResponse::from).collect(),
            panel: snapshot.panel,
            can_return: snapshot.panel.can_return(),
            typing: snapshot.typing,
        }
    }
}

/// Answer to free-text input.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
    pub snapshot: SessionResponse,
}

/// Bot messages produced by a quick reply; empty when it was ignored.
#[derive(Debug, Clone, Serialize)]
pub struct QuickReplyResponse {
    pub replies: Vec<String>,
    pub snapshot: SessionResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub description_loaded: bool,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
