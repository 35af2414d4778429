//! Health, host stats and log tail

use super::{ApiError, SharedState};
use crate::stats::{self, SystemStats};
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
}

pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: state.version,
    })
}

pub async fn system_stats(State(state): State<SharedState>) -> Json<SystemStats> {
    Json(stats::collect(state.version))
}

pub async fn logs(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let logs = stats::tail_log(state.config.logging.file_path.as_deref())?;
    Ok(Json(json!({ "logs": logs })))
}
