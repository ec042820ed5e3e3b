//! Unauthenticated reader routes: posts, contact form, sponsorship.

use crate::handlers::{contact, posts, sponsor};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(posts::list))
        .route("/posts/:id", get(posts::read))
        .route("/contact", post(contact::submit))
        .with_state(state)
}

pub fn sponsor_routes(state: AppState) -> Router {
    Router::new()
        .route("/create", post(sponsor::create))
        .route("/status/:order_id", get(sponsor::status))
        .route("/list", get(sponsor::list))
        .route("/stats", get(sponsor::stats))
        .route("/mock-callback/:order_id", post(sponsor::mock_callback))
        .with_state(state)
}
