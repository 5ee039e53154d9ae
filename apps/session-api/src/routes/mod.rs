pub mod health;
pub mod tokens;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/internal/v1", tokens::router())
}
