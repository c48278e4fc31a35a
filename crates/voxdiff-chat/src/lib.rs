//! The `POST /chat` endpoint
//!
//! A turn builds a prompt from the user's message and selected code, asks
//! the language model once, recovers the JSON answer and, for the voice
//! protocol, speaks the reply.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod orchestrator;
mod parser;
mod prompt;
mod reply;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use voxdiff_core::ExtractPayload;

pub use orchestrator::ChatService;
pub use parser::{ModelReply, find_json_object, parse_model_reply, strip_code_fence};
pub use prompt::build_prompt;
pub use reply::ChatReply;
pub use types::{ChatRequest, ChatResponse, PatchChatResponse, ProposedPatch, VoiceChatResponse};

/// Create the endpoint router for chat
pub fn endpoint_router() -> Router<Arc<ChatService>> {
    Router::new().route("/chat", post(chat))
}

async fn chat(
    State(service): State<Arc<ChatService>>,
    ExtractPayload(request): ExtractPayload<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::debug!(
        message_len = request.message.len(),
        has_selection = request.selected_code().is_some(),
        history_len = request.history.len(),
        protocol = ?service.protocol(),
        "chat handler called"
    );

    Json(service.respond(&request).await)
}
