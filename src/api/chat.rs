//! `/api/chat`: history and one relayed chat turn

use super::{ApiError, SharedState};
use crate::config::MAX_HISTORY_LIMIT;
use crate::history::{ChatMessage, Role};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Recent messages, oldest first
pub async fn history(
    State(state): State<SharedState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(state.config.storage.history_limit)
        .min(MAX_HISTORY_LIMIT);

    let mut messages = state.history.recent(limit)?;
    messages.reverse();
    Ok(Json(messages))
}

/// Record the user message, relay it, record and return the reply
///
/// The user row is kept even when the agent fails; the assistant row is only
/// written for a successful reply.
pub async fn send(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }

    state.history.append(Role::User, &request.message)?;
    let reply = state.agent.converse(&request.message).await?;
    state.history.append(Role::Assistant, &reply)?;

    Ok(Json(ChatResponse { response: reply }))
}

/// Delete the whole history
pub async fn clear(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let deleted = state.history.clear()?;
    tracing::info!(deleted, "chat history cleared");
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
