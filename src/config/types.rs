//! Runtime settings resolved from the environment.

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Deployment environment. Development enables permissive CORS and verbose logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    /// Full connection URL; when set it wins over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, crate::error::ConfigError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| crate::error::ConfigError::Invalid {
                    key: "DATABASE_URL",
                    reason: e.to_string(),
                });
        }
        let ssl_mode = self
            .ssl_mode
            .parse::<PgSslMode>()
            .map_err(|e| crate::error::ConfigError::Invalid {
                key: "DB_SSLMODE",
                reason: e.to_string(),
            })?;
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode))
    }
}

/// Credentials for the admin account created on first start.
#[derive(Clone, Debug)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub server_host: String,
    pub server_port: u16,
    pub database: DatabaseSettings,
    pub jwt_secret: String,
    pub upload_path: PathBuf,
    /// Request body limit in bytes.
    pub max_upload_size: usize,
    pub allowed_origins: Vec<String>,
    pub environment: Environment,
    pub admin: AdminSeed,
}

impl Settings {
    pub fn bind_addr(&self) -> Result<SocketAddr, crate::error::ConfigError> {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .map_err(|e: std::net::AddrParseError| crate::error::ConfigError::Invalid {
                key: "SERVER_HOST",
                reason: e.to_string(),
            })
    }

    /// Default tracing filter for this environment (used when `RUST_LOG` is unset).
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "blog_backend=debug,blog_server=debug,tower_http=debug",
            Environment::Production => "blog_backend=info,blog_server=info,tower_http=info",
        }
    }
}
