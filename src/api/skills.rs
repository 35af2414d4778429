//! `/api/skills`

use super::{ApiError, SharedState};
use crate::relay::{SkillAction, SkillOutput};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub action: String,
    pub skill: String,
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let output = state.skills.list().await?;
    Ok(Json(json!({ "output": output })))
}

pub async fn manage(
    State(state): State<SharedState>,
    payload: Result<Json<SkillRequest>, JsonRejection>,
) -> Result<Json<SkillOutput>, ApiError> {
    let Json(request) = payload?;
    let action: SkillAction = request.action.parse()?;
    let output = state.skills.apply(action, &request.skill).await?;
    Ok(Json(output))
}
