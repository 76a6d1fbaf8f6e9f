use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::app::AppState;

/// GET /latest-data: the most recently stored reading, or 204 before the
/// writer's first successful tick.
pub async fn latest_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.latest.get() {
        Some(reading) => Json(reading).into_response(),
        None => (StatusCode::NO_CONTENT, "No data generated yet").into_response(),
    }
}
