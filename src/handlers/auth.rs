//! Login and self-service account endpoints.

use crate::error::AppError;
use crate::extractors::{ApiJson, AuthClaims};
use crate::models::{ChangePasswordRequest, LoginRequest, ProfileUpdate};
use crate::response::{success_empty, success_one_ok};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.identity.login(&body).await?;
    Ok(success_one_ok("Login successful", session))
}

/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<impl IntoResponse, AppError> {
    let user = state.identity.get_profile(claims.user_id).await?;
    Ok(success_one_ok("Profile fetched successfully", user))
}

/// PUT /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.identity.update_profile(claims.user_id, &body).await?;
    Ok(success_one_ok("Profile updated successfully", user))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.identity.change_password(claims.user_id, &body).await?;
    Ok(success_empty("Password changed successfully"))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<impl IntoResponse, AppError> {
    let token = state.identity.refresh_token(claims.user_id).await?;
    Ok(success_one_ok("Token refreshed successfully", token))
}
