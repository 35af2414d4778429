//! `/api/setup`

use super::{ApiError, SharedState};
use crate::setup::SetupRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn apply(
    State(state): State<SharedState>,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    state.env_file.apply(&request.updates())?;
    Ok(Json(json!({ "success": true })))
}
