//! Shared application state for all routes. Components are built once and cloned per request.

use crate::config::Settings;
use crate::service::{ContentService, DonationService, IdentityService, InquiryService, TokenIssuer};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub tokens: Arc<TokenIssuer>,
    pub identity: IdentityService,
    pub content: ContentService,
    pub inquiry: InquiryService,
    pub donation: DonationService,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let tokens = Arc::new(TokenIssuer::new(settings.jwt_secret.as_bytes()));
        AppState {
            identity: IdentityService::new(pool.clone(), tokens.clone()),
            content: ContentService::new(pool.clone()),
            inquiry: InquiryService::new(pool.clone()),
            donation: DonationService::new(pool.clone()),
            settings: Arc::new(settings),
            tokens,
            pool,
        }
    }
}
