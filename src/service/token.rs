//! Signed bearer tokens (HS256 JWT) and the two auth gates: verify, then role.

use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const ISSUER: &str = "techblog-api";
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Identity carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: i64, username: &str, role: &str, issued_at: DateTime<Utc>) -> Self {
        Claims {
            user_id,
            username: username.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            iss: ISSUER.to_string(),
        }
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;
        TokenIssuer {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing: {}", e)))
    }

    /// Fresh 24h token for the given identity.
    pub fn issue_for(&self, user_id: i64, username: &str, role: &str) -> Result<String, AppError> {
        self.issue(&Claims::new(user_id, username, role, Utc::now()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })
    }
}

/// Token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AppError> {
    let header = header.ok_or(AppError::MissingToken)?;
    if header.trim().is_empty() {
        return Err(AppError::MissingToken);
    }
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MalformedHeader)?;
    Ok(token)
}

/// Second gate after [`TokenIssuer::verify`].
pub fn require_role(claims: &Claims, role: &str) -> Result<(), AppError> {
    if claims.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
