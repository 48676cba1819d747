//! Stateless status endpoints.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /setup-done`: the platform polls this to decide whether to show setup.
pub async fn setup_done() -> Json<Value> {
    Json(json!({ "is_setup_completed": true }))
}

/// `GET /`: service banner.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Voice task relay API" }))
}
