//! Identity component: login, profile, password change, token refresh.

use crate::error::{AppError, Resource};
use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse, ProfileUpdate, TokenResponse, User};
use crate::service::token::TokenIssuer;
use crate::service::validation::{non_empty, RequestValidator};
use sqlx::PgPool;
use std::sync::Arc;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, avatar, bio, active, created_at, updated_at";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct IdentityService {
    pool: PgPool,
    tokens: Arc<TokenIssuer>,
}

impl IdentityService {
    pub fn new(pool: PgPool, tokens: Arc<TokenIssuer>) -> Self {
        IdentityService { pool, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let username = RequestValidator::required("username", &req.username)?;
        RequestValidator::required("password", &req.password)?;
        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE username = $1 AND active = TRUE",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        let Some(user) = user else {
            tracing::warn!(username = %username, "login for unknown or inactive user");
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(&req.password, &user.password_hash).await? {
            tracing::warn!(username = %username, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        let token = self.tokens.issue_for(user.id, &user.username, &user.role)?;
        tracing::info!(user_id = user.id, "login succeeded");
        Ok(LoginResponse { token, user })
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<User, AppError> {
        self.load(user_id).await
    }

    /// Only non-empty fields overwrite stored values.
    pub async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<User, AppError> {
        let email = non_empty(update.email.as_deref());
        if let Some(email) = email {
            RequestValidator::max_length("email", email, 100)?;
            RequestValidator::email("email", email)?;
        }
        let bio = non_empty(update.bio.as_deref());
        if let Some(bio) = bio {
            RequestValidator::max_length("bio", bio, 500)?;
        }
        let avatar = non_empty(update.avatar.as_deref());
        if let Some(avatar) = avatar {
            RequestValidator::max_length("avatar", avatar, 500)?;
        }
        let user: Option<User> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                bio = COALESCE($3, bio),
                avatar = COALESCE($4, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(email)
        .bind(bio)
        .bind(avatar)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or(AppError::NotFound(Resource::User))
    }

    pub async fn change_password(&self, user_id: i64, req: &ChangePasswordRequest) -> Result<(), AppError> {
        RequestValidator::required("currentPassword", &req.current_password)?;
        RequestValidator::min_length("newPassword", &req.new_password, MIN_PASSWORD_LEN)?;
        let user = self.load(user_id).await?;
        if !verify_password(&req.current_password, &user.password_hash).await? {
            return Err(AppError::IncorrectPassword);
        }
        let hash = hash_password(&req.new_password).await?;
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&hash)
            .execute(&self.pool)
            .await?;
        tracing::info!(user_id, "password changed");
        Ok(())
    }

    /// New token with a fresh expiry for the same identity; the password is not re-checked.
    /// Deactivated accounts cannot refresh.
    pub async fn refresh_token(&self, user_id: i64) -> Result<TokenResponse, AppError> {
        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE id = $1 AND active = TRUE",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(user) = user else {
            tracing::warn!(user_id, "token refresh for unknown or inactive user");
            return Err(AppError::NotFound(Resource::User));
        };
        let token = self.tokens.issue_for(user.id, &user.username, &user.role)?;
        Ok(TokenResponse { token })
    }

    async fn load(&self, user_id: i64) -> Result<User, AppError> {
        let user: Option<User> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        user.ok_or(AppError::NotFound(Resource::User))
    }
}

/// bcrypt is CPU bound; keep it off the async workers.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("hash task: {}", e)))?
        .map_err(AppError::from)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task: {}", e)))?
        .or_else(|e| {
            // A malformed stored hash can never match.
            tracing::warn!(error = %e, "stored password hash is unreadable");
            Ok(false)
        })
}
