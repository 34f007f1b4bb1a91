//! HTTP routes.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod quiz;
pub mod results;
pub mod telegram;

/// Builds the full route tree, shared by the server binary and tests.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/quiz", quiz::router())
        .nest("/api/v1/results", results::router())
        .nest("/telegram", telegram::router())
}
