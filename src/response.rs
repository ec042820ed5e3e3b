//! Uniform response envelope: `{success, message, data?, error?, meta?}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> Envelope<T> {
    pub fn failure(message: impl Into<String>, code: impl Into<String>) -> Self {
        Envelope {
            success: false,
            message: message.into(),
            data: None,
            error: Some(code.into()),
            meta: None,
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// One page of rows plus the unpaginated total.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

pub type ApiResponse<T> = (StatusCode, Json<Envelope<T>>);

fn with_status<T: Serialize>(status: StatusCode, message: &str, data: Option<T>) -> ApiResponse<T> {
    (
        status,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data,
            error: None,
            meta: None,
        }),
    )
}

pub fn success_one_ok<T: Serialize>(message: &str, data: T) -> ApiResponse<T> {
    with_status(StatusCode::OK, message, Some(data))
}

pub fn success_one<T: Serialize>(message: &str, data: T) -> ApiResponse<T> {
    with_status(StatusCode::CREATED, message, Some(data))
}

/// Success with no payload (deletes, password change).
pub fn success_empty(message: &str) -> ApiResponse<()> {
    with_status(StatusCode::OK, message, None)
}

pub fn success_many<T: Serialize>(message: &str, page: Page<T>) -> ApiResponse<Vec<T>> {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data: Some(page.items),
            error: None,
            meta: Some(page.meta),
        }),
    )
}
