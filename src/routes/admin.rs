//! Admin routes. Every handler here takes `AdminClaims`, so each request needs an admin bearer token.

use crate::handlers::{contact, posts};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(posts::admin_list).post(posts::create))
        .route("/posts/deleted", get(posts::admin_list_deleted))
        .route(
            "/posts/:id",
            get(posts::admin_read).put(posts::update).delete(posts::delete),
        )
        .route("/messages", get(contact::list))
        .route("/messages/:id", get(contact::read).delete(contact::delete))
        .route("/messages/:id/read", put(contact::mark_read))
        .route("/messages/:id/replied", put(contact::mark_replied))
        .with_state(state)
}
