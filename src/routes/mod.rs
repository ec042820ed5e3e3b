//! Router assembly: `/api/v1` route groups, the root index, static uploads and the HTTP layers.

mod account;
mod admin;
mod common;
mod public;

pub use account::auth_routes;
pub use admin::admin_routes;
pub use common::{health_routes, index_routes};
pub use public::{public_routes, sponsor_routes};

use crate::config::Settings;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";

/// All API groups, unprefixed.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .merge(health_routes(state.clone()))
        .merge(public_routes(state.clone()))
        .nest("/sponsor", sponsor_routes(state.clone()))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

/// The full application: API under `/api/v1`, index at `/`, uploads at `/uploads`.
pub fn app(state: AppState) -> Router {
    let settings = state.settings.clone();
    Router::new()
        .merge(index_routes())
        .nest(API_PREFIX, api_routes(state))
        .nest_service("/uploads", ServeDir::new(&settings.upload_path))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.max_upload_size))
        .layer(cors_layer(&settings))
        .layer(TraceLayer::new_for_http())
}

/// Any origin in development. Production allows only the configured origins, with credentials.
pub fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.environment.is_development() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ORIGIN,
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
