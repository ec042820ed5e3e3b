//! Settings validation: catches values that cannot work before the server starts.

use crate::config::types::Settings;
use crate::config::DEFAULT_JWT_SECRET;
use crate::error::ConfigError;

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.jwt_secret.is_empty() {
        return Err(ConfigError::Invalid {
            key: "JWT_SECRET",
            reason: "must not be empty".into(),
        });
    }
    if settings.database.max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "DB_MAX_CONNECTIONS",
            reason: "must be at least 1".into(),
        });
    }
    if settings.max_upload_size == 0 {
        return Err(ConfigError::Invalid {
            key: "MAX_FILE_SIZE",
            reason: "must be at least 1".into(),
        });
    }
    if settings.admin.username.trim().is_empty() || settings.admin.password.is_empty() {
        return Err(ConfigError::Invalid {
            key: "ADMIN_USERNAME",
            reason: "admin username and password must be set".into(),
        });
    }
    Ok(())
}

/// Production running on the built-in JWT secret. Not fatal; the server logs a warning.
pub fn uses_default_secret(settings: &Settings) -> bool {
    !settings.environment.is_development() && settings.jwt_secret == DEFAULT_JWT_SECRET
}
