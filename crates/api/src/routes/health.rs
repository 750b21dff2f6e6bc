//! Liveness probe.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /healthz
///
/// Returns 200 when the process is up and the database is reachable.
pub async fn healthz(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    maistor_db::health_check(&state.pool).await?;

    Ok(Json(json!({ "status": "ok" })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}
