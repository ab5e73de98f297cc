//! Route configuration for chat endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_session, delete_session, get_description, get_session, health, reset_session,
    send_message, send_quick_reply, ChatAppState,
};

/// Creates the chat router with all endpoints.
///
/// Routes:
/// - `GET /health` - Liveness and description status
/// - `POST /api/sessions` - Open a session (with greeting)
/// - `GET /api/sessions/:id` - Session snapshot
/// - `DELETE /api/sessions/:id` - Close a session
/// - `POST /api/sessions/:id/reset` - Empty transcript, back to main menu
/// - `POST /api/sessions/:id/messages` - Free-text input
/// - `POST /api/sessions/:id/quick-replies` - Quick-reply click
/// - `GET /api/description?category=` - Description document or one category
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/api/sessions/:id/quick-replies", post(send_quick_reply))
        .route("/api/description", get(get_description))
}
