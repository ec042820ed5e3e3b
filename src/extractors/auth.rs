//! Bearer-token extractors: `AuthClaims` for any signed-in user, `AdminClaims` for the admin role.

use crate::error::AppError;
use crate::models::ROLE_ADMIN;
use crate::service::token::{parse_bearer, require_role, Claims};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

/// Verified claims from `Authorization: Bearer <token>`.
#[derive(Clone, Debug)]
pub struct AuthClaims(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AppError::MalformedHeader))
            .transpose()?;
        let token = parse_bearer(header)?;
        let claims = state.tokens.verify(token).map_err(|e| {
            tracing::warn!(error = %e, path = %parts.uri.path(), "rejected bearer token");
            e
        })?;
        Ok(AuthClaims(claims))
    }
}

/// Claims of a signed-in admin. Other roles get 403.
#[derive(Clone, Debug)]
pub struct AdminClaims(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AdminClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;
        if let Err(e) = require_role(&claims, ROLE_ADMIN) {
            tracing::warn!(user_id = claims.user_id, role = %claims.role, "admin route refused");
            return Err(e);
        }
        Ok(AdminClaims(claims))
    }
}
