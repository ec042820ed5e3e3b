//! Typed errors and HTTP mapping.

use crate::response::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Entity kinds that can be missing; drives the `<kind>_not_found` error code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Post,
    Message,
    Order,
    User,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Resource::Post => "post",
            Resource::Message => "message",
            Resource::Order => "order",
            Resource::User => "user",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("authorization header required")]
    MissingToken,
    #[error("invalid authorization header format")]
    MalformedHeader,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("current password is incorrect")]
    IncorrectPassword,
    #[error("admin access required")]
    Forbidden,
    #[error("{} not found", .0.label())]
    NotFound(Resource),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("cannot {action} an order that is {from}")]
    InvalidTransition { from: String, action: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database unavailable")]
    Unavailable,
    #[error("database: {0}")]
    Db(sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        let unique_violation = e
            .as_database_error()
            .and_then(|d| d.code())
            .is_some_and(|code| code == "23505");
        if unique_violation {
            let detail = e
                .as_database_error()
                .and_then(|d| d.constraint().map(String::from))
                .unwrap_or_else(|| "unique constraint".into());
            return AppError::Conflict(detail);
        }
        AppError::Db(e)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing: {}", e))
    }
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, String) {
        let (status, code) = match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "missing_token"),
            AppError::MalformedHeader => (StatusCode::UNAUTHORIZED, "invalid_token_format"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::ExpiredToken => (StatusCode::UNAUTHORIZED, "token_expired"),
            AppError::IncorrectPassword => (StatusCode::UNAUTHORIZED, "invalid_current_password"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "insufficient_privileges"),
            AppError::NotFound(resource) => {
                return (StatusCode::NOT_FOUND, format!("{}_not_found", resource.label()));
            }
            AppError::InvalidAction(_) => (StatusCode::BAD_REQUEST, "invalid_action"),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_state_transition"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "database_unavailable"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        (status, code.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, code = %code, "request failed");
            // Store and internal details stay in the log.
            match status {
                StatusCode::SERVICE_UNAVAILABLE => self.to_string(),
                _ => "internal server error".to_string(),
            }
        } else {
            self.to_string()
        };
        (status, Json(Envelope::<()>::failure(message, code))).into_response()
    }
}
