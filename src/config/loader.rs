//! Load settings from process environment (after `.env`) or from any key lookup.

use crate::config::types::{AdminSeed, DatabaseSettings, Environment, Settings};
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

pub const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key-change-this-in-production";
const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Load `.env` if present, then read settings from the process environment.
pub fn load_from_env() -> Result<Settings, ConfigError> {
    if dotenvy::dotenv().is_err() {
        tracing::debug!("no .env file found, using environment variables");
    }
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] but reads from a map. Used in tests.
pub fn load_from_map(vars: &HashMap<String, String>) -> Result<Settings, ConfigError> {
    load_with(|key| vars.get(key).cloned())
}

pub fn load_with<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let mut allowed_origins = vec![
        get("FRONTEND_URL", "http://localhost:5173"),
        "http://localhost:3000".to_string(),
    ];
    if let Some(extra) = lookup("ALLOWED_ORIGINS") {
        allowed_origins.extend(
            extra
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
    }
    let mut seen = HashSet::new();
    allowed_origins.retain(|origin| seen.insert(origin.clone()));

    let settings = Settings {
        server_host: get("SERVER_HOST", "0.0.0.0"),
        server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
        database: DatabaseSettings {
            url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            host: get("DB_HOST", "localhost"),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            user: get("DB_USER", "postgres"),
            password: get("DB_PASSWORD", "password"),
            name: get("DB_NAME", "techblog"),
            ssl_mode: get("DB_SSLMODE", "disable"),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
        },
        jwt_secret: get("JWT_SECRET", DEFAULT_JWT_SECRET),
        upload_path: get("UPLOAD_PATH", "./uploads").into(),
        max_upload_size: parse_or(&lookup, "MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
        allowed_origins,
        environment: Environment::parse(&get("ENVIRONMENT", "development")),
        admin: AdminSeed {
            username: get("ADMIN_USERNAME", "admin"),
            password: get("ADMIN_PASSWORD", "admin123"),
            email: get("ADMIN_EMAIL", "admin@techblog.com"),
        },
    };
    crate::config::validate(&settings)?;
    Ok(settings)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}
