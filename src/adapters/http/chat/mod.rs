//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    DescriptionQuery, ErrorResponse, HealthResponse, MessageResponse, QuickReplyRequest,
    QuickReplyResponse, SendMessageRequest, SendMessageResponse, SessionResponse,
};
pub use handlers::{ChatApiError, ChatAppState};
pub use routes::chat_router;
