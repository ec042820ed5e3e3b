//! Contact form submission and the admin inbox.

use crate::error::AppError;
use crate::extractors::{AdminClaims, ApiJson, ApiPath, ApiQuery};
use crate::models::{ContactInput, MessageQuery};
use crate::response::{success_empty, success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

/// POST /api/v1/contact
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactInput>,
) -> Result<impl IntoResponse, AppError> {
    let msg = state.inquiry.submit(&body).await?;
    Ok(success_one("Message sent successfully", msg))
}

/// GET /api/v1/admin/messages
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiQuery(query): ApiQuery<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.inquiry.list(&query).await?;
    Ok(success_many("Messages fetched successfully", page))
}

/// GET /api/v1/admin/messages/:id
pub async fn read(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let msg = state.inquiry.get(id).await?;
    Ok(success_one_ok("Message fetched successfully", msg))
}

/// PUT /api/v1/admin/messages/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let msg = state.inquiry.mark_read(id).await?;
    Ok(success_one_ok("Message marked as read", msg))
}

/// PUT /api/v1/admin/messages/:id/replied
pub async fn mark_replied(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let msg = state.inquiry.mark_replied(id).await?;
    Ok(success_one_ok("Message marked as replied", msg))
}

/// DELETE /api/v1/admin/messages/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.inquiry.delete(id).await?;
    Ok(success_empty("Message deleted successfully"))
}
