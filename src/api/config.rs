//! `/api/config`: the agent settings document

use super::{ApiError, SharedState};
use crate::settings::AgentSettings;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn show(State(state): State<SharedState>) -> Result<Json<AgentSettings>, ApiError> {
    match state.settings.read()? {
        Some(settings) => Ok(Json(settings)),
        None => Err(ApiError::not_found("Config not found")),
    }
}

/// Replace the document wholesale
pub async fn replace(
    State(state): State<SharedState>,
    payload: Result<Json<AgentSettings>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(settings) = payload?;
    state.settings.write(&settings)?;
    tracing::info!(
        path = %state.settings.path().display(),
        providers = ?settings.configured_providers(),
        "agent settings saved"
    );
    Ok(Json(json!({ "success": true })))
}
