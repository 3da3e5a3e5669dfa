// src/routes/chat.rs
use axum::{Json, extract::State};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = payload.message.unwrap_or_default();
    if message.is_empty() {
        return Err(AppError::BadRequest("No message provided".to_string()));
    }

    // Completion failures come back as "Error: ..." strings, so this is
    // always a 200 with something to show the user.
    let bot_response = state.completion.complete(&message).await;

    Ok(Json(ChatResponse {
        user_message: message,
        bot_response,
    }))
}
