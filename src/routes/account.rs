//! Login plus token-protected account routes.

use crate::handlers::auth;
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile).put(auth::update_profile))
        .route("/change-password", post(auth::change_password))
        .route("/refresh", post(auth::refresh))
        .with_state(state)
}
