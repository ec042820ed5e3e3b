//! Router tests for auth gates and request validation. None of these reach the store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use blog_backend::service::Claims;
use blog_backend::{app, load_from_map, AppState};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

/// Pool that never connects until used; port 1 refuses, so stray store calls fail fast.
fn lazy_pool() -> sqlx::PgPool {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("nobody")
        .database("nothing");
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy_with(options)
}

fn test_state(extra: &[(&str, &str)]) -> AppState {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("JWT_SECRET".into(), SECRET.into());
    for (k, v) in extra {
        vars.insert((*k).into(), (*v).into());
    }
    let settings = load_from_map(&vars).unwrap();
    AppState::new(lazy_pool(), settings)
}

fn test_router() -> (Router, AppState) {
    let state = test_state(&[]);
    (app(state.clone()), state)
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn assert_failure(body: &Value, code: &str) {
    assert_eq!(body["success"], Value::Bool(false), "body: {body}");
    assert_eq!(body["error"], Value::String(code.into()), "body: {body}");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn index_lists_service_and_version() {
    let (router, _) = test_router();
    let (status, body) = send(router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "v1.0.0");
    assert!(body["endpoints"]["admin"].is_array());
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    let (router, _) = test_router();
    let (status, body) = send(router, get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_failure(&body, "database_unavailable");
}

#[tokio::test]
async fn profile_without_header_is_missing_token() {
    let (router, _) = test_router();
    let (status, body) = send(router, get("/api/v1/auth/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "missing_token");
}

#[tokio::test]
async fn non_bearer_scheme_is_bad_format() {
    let (router, _) = test_router();
    let (status, body) = send(router, get_with_auth("/api/v1/auth/profile", "Token abc")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "invalid_token_format");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let (router, _) = test_router();
    let (status, body) = send(router, get_with_auth("/api/v1/auth/profile", "Bearer not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "invalid_token");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_invalid() {
    let (router, _) = test_router();
    let foreign = test_state(&[("JWT_SECRET", "some-other-secret")]);
    let token = foreign.tokens.issue_for(1, "admin", "admin").unwrap();
    let (status, body) = send(
        router,
        get_with_auth("/api/v1/admin/messages", &format!("Bearer {token}")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "invalid_token");
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let (router, state) = test_router();
    let claims = Claims::new(1, "admin", "admin", Utc::now() - ChronoDuration::hours(48));
    let token = state.tokens.issue(&claims).unwrap();
    let (status, body) = send(
        router,
        get_with_auth("/api/v1/auth/profile", &format!("Bearer {token}")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "token_expired");
}

#[tokio::test]
async fn non_admin_token_is_forbidden_on_admin_routes() {
    let (router, state) = test_router();
    let token = state.tokens.issue_for(7, "reader", "user").unwrap();
    for uri in ["/api/v1/admin/messages", "/api/v1/admin/posts", "/api/v1/admin/posts/3"] {
        let (status, body) = send(router.clone(), get_with_auth(uri, &format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_failure(&body, "insufficient_privileges");
    }
}

#[tokio::test]
async fn admin_route_rejects_non_numeric_id() {
    let (router, state) = test_router();
    let token = state.tokens.issue_for(1, "admin", "admin").unwrap();
    let (status, body) = send(
        router,
        get_with_auth("/api/v1/admin/messages/abc", &format!("Bearer {token}")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "validation_error");
}

#[tokio::test]
async fn admin_create_without_token_is_rejected_before_body() {
    let (router, _) = test_router();
    let (status, body) = send(router, post_json("/api/v1/admin/posts", "{not json")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "missing_token");
}

#[tokio::test]
async fn contact_with_bad_email_is_rejected() {
    let (router, _) = test_router();
    let (status, body) = send(
        router,
        post_json(
            "/api/v1/contact",
            r#"{"name":"Ann","email":"nope","subject":"Hi","message":"Hello"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "validation_error");
}

#[tokio::test]
async fn contact_with_missing_fields_is_rejected() {
    let (router, _) = test_router();
    let (status, body) = send(router, post_json("/api/v1/contact", r#"{"name":"Ann"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "validation_error");
}

#[tokio::test]
async fn malformed_json_uses_the_envelope() {
    let (router, _) = test_router();
    let (status, body) = send(router, post_json("/api/v1/contact", "{\"name\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "validation_error");
}

#[tokio::test]
async fn sponsor_amount_must_be_positive() {
    let (router, _) = test_router();
    for payload in [r#"{"amount":0}"#, r#"{"amount":-3.5}"#] {
        let (status, body) = send(router.clone(), post_json("/api/v1/sponsor/create", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_failure(&body, "validation_error");
    }
}

#[tokio::test]
async fn unknown_callback_action_is_rejected() {
    let (router, _) = test_router();
    let (status, body) = send(
        router,
        post_json("/api/v1/sponsor/mock-callback/SP1700000000abcdef12?action=refund", ""),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "invalid_action");
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let state = test_state(&[("MAX_FILE_SIZE", "64")]);
    let router = app(state);
    let big = format!(r#"{{"name":"{}"}}"#, "x".repeat(1_000));
    let response = router.oneshot(post_json("/api/v1/contact", &big)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn production_cors_allows_only_configured_origins() {
    let state = test_state(&[("ENVIRONMENT", "production"), ("FRONTEND_URL", "https://blog.example.com")]);
    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/posts")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app(state.clone()).oneshot(preflight("https://blog.example.com")).await.unwrap();
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://blog.example.com"
    );
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    let refused = app(state).oneshot(preflight("https://evil.example.com")).await.unwrap();
    assert!(refused.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
