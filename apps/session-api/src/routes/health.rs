use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.kv.ping().await.map_err(|e| {
        tracing::warn!(?e, "store ping failed");
        ApiError::unavailable("Store unreachable")
    })?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
