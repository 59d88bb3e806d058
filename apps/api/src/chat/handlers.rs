use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::chat::{ChatReply, ChatTurn};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// POST /chat/ask
/// Generates the assistant reply for the submitted chat history.
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state.chat.respond(&request.history).await?;
    Ok(Json(reply))
}
