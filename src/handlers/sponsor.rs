//! Donation endpoints. Public: there is no real payment provider behind them.

use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::models::{CallbackAction, CallbackQuery, SponsorRequest};
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::donation::DEFAULT_PAGE_SIZE;
use crate::service::{PageParams, PageRequest};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;

/// POST /api/v1/sponsor/create
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SponsorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.donation.create_order(&body).await?;
    Ok(success_one("Order created successfully", order))
}

/// GET /api/v1/sponsor/status/:orderId
pub async fn status(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.donation.get_status(&order_id).await?;
    Ok(success_one_ok("Order status fetched successfully", view))
}

/// GET /api/v1/sponsor/list: paid orders only.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = state
        .donation
        .list_paid(PageRequest::from_params(params, DEFAULT_PAGE_SIZE))
        .await?;
    Ok(success_many("Sponsors fetched successfully", page))
}

/// GET /api/v1/sponsor/stats
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.donation.stats(Utc::now()).await?;
    Ok(success_one_ok("Sponsor stats fetched successfully", stats))
}

/// POST /api/v1/sponsor/mock-callback/:orderId?action=pay|cancel
pub async fn mock_callback(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let action: CallbackAction = query.action.as_deref().unwrap_or("pay").parse()?;
    let result = state.donation.simulate_callback(&order_id, action).await?;
    Ok(success_one_ok("Payment callback processed", result))
}
