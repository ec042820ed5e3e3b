//! Common routes: service index and health.

use crate::handlers::common::{health, index};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET / (service index, mounted at the root).
pub fn index_routes() -> Router {
    Router::new().route("/", get(index))
}

/// GET /health with a store ping. Requires AppState.
pub fn health_routes(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
