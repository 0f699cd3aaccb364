use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::{error::ApiError, state::AppState};
use crate::domain::Message;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub query: String,
    pub response: String,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut workspace = state.workspace.lock().await;
    let reply = workspace.ask(&request.message).await?;

    Ok(Json(ChatResponse {
        query: reply.answer.query,
        response: reply.answer.result,
        formatted: reply.formatted,
    }))
}

pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let workspace = state.workspace.lock().await;
    Json(HistoryResponse {
        messages: workspace.conversation().messages().to_vec(),
    })
}
