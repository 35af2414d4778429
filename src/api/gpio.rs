//! `/api/gpio`: pin layout bookkeeping

use super::{ApiError, SharedState};
use crate::gpio::{self, HeaderPin, PinConfiguration};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn layout(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PinConfiguration>>, ApiError> {
    Ok(Json(gpio::load_layout(&state.history)?))
}

pub async fn save(
    State(state): State<SharedState>,
    payload: Result<Json<Vec<PinConfiguration>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(pins) = payload?;
    gpio::save_layout(&state.history, &pins)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn header() -> Json<&'static [HeaderPin]> {
    Json(gpio::header())
}
