//! Service index and health check.

use crate::error::AppError;
use crate::state::AppState;
use crate::store::{self, StoreCounts};
use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

pub const API_VERSION: &str = "v1.0.0";

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
    timestamp: i64,
    version: &'static str,
    database: &'static str,
    stats: StoreCounts,
}

/// GET /api/v1/health: store ping plus row counts. 503 when the store is unreachable.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthBody>, AppError> {
    store::ping(&state.pool).await?;
    let stats = store::counts(&state.pool).await?;
    Ok(Json(HealthBody {
        status: "healthy",
        timestamp: Utc::now().timestamp(),
        version: API_VERSION,
        database: "connected",
        stats,
    }))
}

/// GET /: service name, version and route index.
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "TechBlog API Server",
        "name": env!("CARGO_PKG_NAME"),
        "version": API_VERSION,
        "status": "running",
        "endpoints": {
            "public": [
                "GET /api/v1/health",
                "GET /api/v1/posts",
                "GET /api/v1/posts/:id",
                "POST /api/v1/contact",
                "POST /api/v1/sponsor/create",
                "GET /api/v1/sponsor/status/:orderId",
                "GET /api/v1/sponsor/list",
                "GET /api/v1/sponsor/stats",
                "POST /api/v1/sponsor/mock-callback/:orderId",
            ],
            "auth": [
                "POST /api/v1/auth/login",
                "GET /api/v1/auth/profile",
                "PUT /api/v1/auth/profile",
                "POST /api/v1/auth/change-password",
                "POST /api/v1/auth/refresh",
            ],
            "admin": [
                "GET /api/v1/admin/posts",
                "GET /api/v1/admin/posts/deleted",
                "GET /api/v1/admin/posts/:id",
                "POST /api/v1/admin/posts",
                "PUT /api/v1/admin/posts/:id",
                "DELETE /api/v1/admin/posts/:id",
                "GET /api/v1/admin/messages",
                "GET /api/v1/admin/messages/:id",
                "PUT /api/v1/admin/messages/:id/read",
                "PUT /api/v1/admin/messages/:id/replied",
                "DELETE /api/v1/admin/messages/:id",
            ],
        }
    }))
}
