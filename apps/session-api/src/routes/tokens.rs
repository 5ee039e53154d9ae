//! Token introspection for the connection layer.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::session::token::ValidatedToken;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/tokens/introspect", post(introspect))
}

#[derive(Debug, Deserialize)]
pub struct IntrospectRequest {
    pub token: String,
}

/// Resolve a hex token to its identity and open a session for it.
async fn introspect(
    State(state): State<AppState>,
    Json(body): Json<IntrospectRequest>,
) -> Result<Json<ValidatedToken>, ApiError> {
    let session = state.session.open_session(&body.token).await?;
    Ok(Json(session))
}
