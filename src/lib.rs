//! Blog backend: posts, contact messages, sponsorship orders and admin identity over a REST API.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_from_env, load_from_map, validate, Environment, Settings};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use response::{success_empty, success_many, success_one, success_one_ok, Envelope, PageMeta};
pub use routes::{app, api_routes};
pub use state::AppState;
pub use store::{connect, ensure_database_exists, seed_admin};
