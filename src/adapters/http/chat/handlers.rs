//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::application::{ChatError, ConversationEngine};
use crate::domain::foundation::SessionId;

use super::dto::{
    DescriptionQuery, ErrorResponse, HealthResponse, QuickReplyRequest, QuickReplyResponse,
    SendMessageRequest, SendMessageResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatAppState {
    engine: Arc<ConversationEngine>,
    greet: bool,
}

impl ChatAppState {
    pub fn new(engine: Arc<ConversationEngine>) -> Self {
        Self {
            engine,
            greet: true,
        }
    }

    /// Whether new sessions open with the greeting messages.
    pub fn with_greeting(mut self, greet: bool) -> Self {
        self.greet = greet;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

/// Errors returned by chat endpoints, rendered as `{code, message}`.
#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{0}")]
    Internal(String),
}

impl From<ChatError> for ChatApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::SessionNotFound(id) => ChatApiError::NotFound {
                resource: "Session",
                id: id.to_string(),
            },
            ChatError::EmptyInput | ChatError::InputTooLong { .. } => {
                ChatApiError::BadRequest(err.to_string())
            }
            ChatError::Domain(msg) => ChatApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ChatApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg)),
            ChatApiError::NotFound { resource, id } => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(resource, id))
            }
            ChatApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Chat request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal("Internal error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, ChatApiError> {
    raw.parse::<SessionId>()
        .map_err(|_| ChatApiError::BadRequest("Invalid session ID".to_string()))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health(State(state): State<ChatAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        description_loaded: state.engine.descriptions().is_loaded().await,
    })
}

/// POST /api/sessions - Open a session
pub async fn create_session(State(state): State<ChatAppState>) -> Result<Response, ChatApiError> {
    let snapshot = state.engine.create_session(state.greet).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(snapshot))).into_response())
}

/// GET /api/sessions/:id - Current transcript, panel and typing flag
pub async fn get_session(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ChatApiError> {
    let id = parse_session_id(&session_id)?;
    let snapshot = state.engine.snapshot(&id).await?;
    Ok(Json(snapshot.into()))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ChatApiError> {
    let id = parse_session_id(&session_id)?;
    state.engine.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/reset - Empty transcript, back to the main menu
pub async fn reset_session(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ChatApiError> {
    let id = parse_session_id(&session_id)?;
    let snapshot = state.engine.reset(&id).await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/sessions/:id/messages - Free-text input
pub async fn send_message(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ChatApiError> {
    let id = parse_session_id(&session_id)?;
    let reply = state.engine.handle_user_input(&id, &req.text).await?;
    let snapshot = state.engine.snapshot(&id).await?;
    Ok(Json(SendMessageResponse {
        reply,
        snapshot: snapshot.into(),
    }))
}

/// POST /api/sessions/:id/quick-replies - Button click
pub async fn send_quick_reply(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
    Json(req): Json<QuickReplyRequest>,
) -> Result<Json<QuickReplyResponse>, ChatApiError> {
    let id = parse_session_id(&session_id)?;
    let replies = state.engine.handle_quick_reply(&id, &req.button_id).await?;
    let snapshot = state.engine.snapshot(&id).await?;
    Ok(Json(QuickReplyResponse {
        replies,
        snapshot: snapshot.into(),
    }))
}

/// GET /api/description?category= - Whole document or one top-level category
///
/// Text descriptions are returned as a JSON string and have no categories.
pub async fn get_description(
    State(state): State<ChatAppState>,
    Query(query): Query<DescriptionQuery>,
) -> Result<Json<serde_json::Value>, ChatApiError> {
    let description = state
        .engine
        .descriptions()
        .snapshot()
        .await
        .ok_or_else(|| ChatApiError::NotFound {
            resource: "Description",
            id: "current".to_string(),
        })?;

    let value = match query.category.as_deref() {
        Some(category) => description
            .category(category)
            .cloned()
            .ok_or_else(|| ChatApiError::NotFound {
                resource: "Category",
                id: category.to_string(),
            })?,
        None => description
            .raw()
            .cloned()
            .unwrap_or_else(|| serde_json::Value::String(description.grounding_text().to_string())),
    };
    Ok(Json(value))
}
