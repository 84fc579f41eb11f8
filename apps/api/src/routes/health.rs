use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, active backend and stored criteria sets.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-ranker",
        "backend": state.pipeline.backend.as_str(),
        "criteria_sets": state.criteria_store.len().await,
    }))
}
