//! Blog post endpoints: public reads and admin management.

use crate::error::AppError;
use crate::extractors::{AdminClaims, ApiJson, ApiPath, ApiQuery};
use crate::models::{PostInput, PostQuery};
use crate::response::{success_empty, success_many, success_one, success_one_ok};
use crate::service::content::DEFAULT_PAGE_SIZE;
use crate::service::{Audience, PageParams, PageRequest, PostKey};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

/// GET /api/v1/posts: published posts only.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PostQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.content.list(&query, Audience::Public).await?;
    Ok(success_many("Posts fetched successfully", page))
}

/// GET /api/v1/posts/:id. Accepts a numeric id or a slug; counts a view.
pub async fn read(
    State(state): State<AppState>,
    ApiPath(raw): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.content.get_public(&PostKey::parse(&raw)).await?;
    Ok(success_one_ok("Post fetched successfully", post))
}

/// GET /api/v1/admin/posts
pub async fn admin_list(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiQuery(query): ApiQuery<PostQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.content.list(&query, Audience::Admin).await?;
    Ok(success_many("Posts fetched successfully", page))
}

/// GET /api/v1/admin/posts/deleted
pub async fn admin_list_deleted(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = state
        .content
        .list_deleted(PageRequest::from_params(params, DEFAULT_PAGE_SIZE))
        .await?;
    Ok(success_many("Deleted posts fetched successfully", page))
}

/// GET /api/v1/admin/posts/:id. Drafts included, no view counted.
pub async fn admin_read(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.content.get_admin(id).await?;
    Ok(success_one_ok("Post fetched successfully", post))
}

/// POST /api/v1/admin/posts
pub async fn create(
    State(state): State<AppState>,
    AdminClaims(admin): AdminClaims,
    ApiJson(body): ApiJson<PostInput>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.content.create(&body).await?;
    tracing::info!(post_id = post.id, slug = %post.slug, by = %admin.username, "post created");
    Ok(success_one("Post created successfully", post))
}

/// PUT /api/v1/admin/posts/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminClaims,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<PostInput>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.content.update(id, &body).await?;
    Ok(success_one_ok("Post updated successfully", post))
}

/// DELETE /api/v1/admin/posts/:id (soft delete)
pub async fn delete(
    State(state): State<AppState>,
    AdminClaims(admin): AdminClaims,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.content.delete(id).await?;
    tracing::info!(post_id = id, by = %admin.username, "post deleted");
    Ok(success_empty("Post deleted successfully"))
}
