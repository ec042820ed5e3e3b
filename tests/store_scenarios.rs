//! End-to-end component scenarios against a real PostgreSQL.
//!
//! Run with `TEST_DATABASE_URL=postgres://... cargo test --test store_scenarios`.
//! Without the variable every test returns early.

use blog_backend::error::{AppError, Resource};
use blog_backend::models::{
    CallbackAction, ChangePasswordRequest, ContactInput, LoginRequest, MessageQuery, OrderStatus, PostInput,
    PostQuery, ProfileUpdate, SponsorRequest, User,
};
use blog_backend::service::identity::hash_password;
use blog_backend::service::{
    Audience, ContentService, DonationService, IdentityService, InquiryService, PageRequest, PostKey, TokenIssuer,
};
use blog_backend::apply_migrations;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new().max_connections(4).connect(&url).await.unwrap();
    apply_migrations(&pool).await.unwrap();
    Some(pool)
}

fn nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn post_input(title: &str, published: bool) -> PostInput {
    PostInput {
        title: title.to_string(),
        content: "Rust makes systems programming approachable. ".repeat(10),
        author: "Tester".into(),
        tags: vec!["Rust".into(), "  ".into(), "Web".into()],
        published,
        ..Default::default()
    }
}

#[tokio::test]
async fn titles_become_unique_slugs() {
    let Some(pool) = test_pool().await else { return };
    let content = ContentService::new(pool);
    let n = nonce();
    let title = format!("Hello, World! {n}");

    let first = content.create(&post_input(&title, true)).await.unwrap();
    assert_eq!(first.slug, format!("hello-world-{n}"));
    assert_eq!(first.tags, vec!["Rust".to_string(), "Web".to_string()]);
    assert_eq!(first.read_time, 1);
    assert_eq!(first.view_count, 0);

    let second = content.create(&post_input(&title, true)).await.unwrap();
    assert_ne!(second.slug, first.slug);
    assert!(second.slug.starts_with(&format!("{}-", first.slug)));
}

#[tokio::test]
async fn concurrent_creates_with_one_title_both_succeed() {
    let Some(pool) = test_pool().await else { return };
    let content = ContentService::new(pool);
    let title = format!("Race {}", nonce());
    let (input_a, input_b) = (post_input(&title, true), post_input(&title, true));
    let (a, b) = tokio::join!(content.create(&input_a), content.create(&input_b));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.slug, b.slug);
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_slug() {
    let Some(pool) = test_pool().await else { return };
    let content = ContentService::new(pool);
    let n = nonce();
    let mut input = post_input(&format!("Original {n}"), true);
    input.excerpt = Some("Hand written excerpt".into());
    let post = content.create(&input).await.unwrap();

    let update = PostInput {
        title: format!("Rewritten {n}"),
        content: "word ".repeat(400),
        author: "Editor".into(),
        tags: vec!["Only".into()],
        published: false,
        ..Default::default()
    };
    let updated = content.update(post.id, &update).await.unwrap();
    assert_eq!(updated.slug, post.slug);
    assert_eq!(updated.title, format!("Rewritten {n}"));
    assert_eq!(updated.read_time, 2);
    assert!(updated.excerpt.ends_with("..."));
    assert_ne!(updated.excerpt, "Hand written excerpt");
    assert!(!updated.published);
    assert_eq!(updated.tags, vec!["Only".to_string()]);
    assert_eq!(updated.author, "Editor");

    content.delete(post.id).await.unwrap();
    assert!(matches!(
        content.update(post.id, &update).await,
        Err(AppError::NotFound(Resource::Post))
    ));
}

#[tokio::test]
async fn public_read_counts_views_and_hides_drafts() {
    let Some(pool) = test_pool().await else { return };
    let content = ContentService::new(pool);
    let n = nonce();

    let live = content.create(&post_input(&format!("Live {n}"), true)).await.unwrap();
    let read = content.get_public(&PostKey::Id(live.id)).await.unwrap();
    assert_eq!(read.view_count, 1);
    let by_slug = content.get_public(&PostKey::parse(&live.slug)).await.unwrap();
    assert_eq!(by_slug.view_count, 2);

    let draft = content.create(&post_input(&format!("Draft {n}"), false)).await.unwrap();
    let err = content.get_public(&PostKey::Id(draft.id)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Post)));
    assert_eq!(content.get_admin(draft.id).await.unwrap().view_count, 0);
}

#[tokio::test]
async fn listing_filters_and_soft_delete() {
    let Some(pool) = test_pool().await else { return };
    let content = ContentService::new(pool);
    let n = nonce();
    let tag = format!("Tag{n}");

    let mut input = post_input(&format!("Filtered {n}"), true);
    input.tags = vec![tag.clone()];
    let post = content.create(&input).await.unwrap();
    let mut draft = post_input(&format!("Filtered draft {n}"), false);
    draft.tags = vec![tag.clone()];
    content.create(&draft).await.unwrap();

    let query = PostQuery {
        tag: Some(tag.to_lowercase()),
        published: Some(false),
        ..Default::default()
    };
    let public = content.list(&query, Audience::Public).await.unwrap();
    assert_eq!(public.meta.total, 1);
    assert_eq!(public.items[0].id, post.id);
    let admin_drafts = content.list(&query, Audience::Admin).await.unwrap();
    assert_eq!(admin_drafts.meta.total, 1);
    assert!(!admin_drafts.items[0].published);

    content.delete(post.id).await.unwrap();
    assert!(matches!(content.delete(post.id).await, Err(AppError::NotFound(Resource::Post))));
    assert!(content.get_admin(post.id).await.is_err());
    let after = content.list(&query, Audience::Public).await.unwrap();
    assert_eq!(after.meta.total, 0);
    assert_eq!(after.meta.total_pages, 0);
    let deleted = content.list_deleted(PageRequest::new(None, Some(100), 10)).await.unwrap();
    assert!(deleted.items.iter().any(|p| p.id == post.id));
}

async fn insert_user(pool: &PgPool, username: &str, password: &str) -> i64 {
    let hash = hash_password(password).await.unwrap();
    sqlx::query_scalar("INSERT INTO users (username, email, password_hash, role) VALUES ($1, $2, $3, 'user') RETURNING id")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(&hash)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn profile_update_keeps_unset_fields() {
    let Some(pool) = test_pool().await else { return };
    let n = nonce();
    let id = insert_user(&pool, &format!("prof{n}"), "secret1").await;
    let other = format!("other{n}");
    insert_user(&pool, &other, "secret1").await;
    let identity = IdentityService::new(pool, Arc::new(TokenIssuer::new(b"scenario-secret")));

    let user: User = identity
        .update_profile(
            id,
            &ProfileUpdate {
                bio: Some("Writes about Rust".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.bio, "Writes about Rust");
    assert_eq!(user.email, format!("prof{n}@example.com"));

    let blank = identity
        .update_profile(
            id,
            &ProfileUpdate {
                email: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(blank.email, format!("prof{n}@example.com"));
    assert_eq!(blank.bio, "Writes about Rust");

    let taken = identity
        .update_profile(
            id,
            &ProfileUpdate {
                email: Some(format!("{other}@example.com")),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn refresh_reissues_for_active_users_only() {
    let Some(pool) = test_pool().await else { return };
    let id = insert_user(&pool, &format!("fresh{}", nonce()), "secret1").await;
    let identity = IdentityService::new(pool.clone(), Arc::new(TokenIssuer::new(b"scenario-secret")));

    let refreshed = identity.refresh_token(id).await.unwrap();
    let claims = identity.tokens().verify(&refreshed.token).unwrap();
    assert_eq!(claims.user_id, id);
    assert_eq!(claims.role, "user");

    sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    assert!(matches!(
        identity.refresh_token(id).await,
        Err(AppError::NotFound(Resource::User))
    ));
}

#[tokio::test]
async fn login_and_password_change() {
    let Some(pool) = test_pool().await else { return };
    let n = nonce();
    let username = format!("user{n}");
    insert_user(&pool, &username, "secret1").await;
    let identity = IdentityService::new(pool, Arc::new(TokenIssuer::new(b"scenario-secret")));

    let wrong = identity
        .login(&LoginRequest {
            username: username.clone(),
            password: "nope".into(),
        })
        .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let session = identity
        .login(&LoginRequest {
            username: username.clone(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    let claims = identity.tokens().verify(&session.token).unwrap();
    assert_eq!(claims.username, username);

    let bad = identity
        .change_password(
            claims.user_id,
            &ChangePasswordRequest {
                current_password: "wrong".into(),
                new_password: "another1".into(),
            },
        )
        .await;
    assert!(matches!(bad, Err(AppError::IncorrectPassword)));

    identity
        .change_password(
            claims.user_id,
            &ChangePasswordRequest {
                current_password: "secret1".into(),
                new_password: "another1".into(),
            },
        )
        .await
        .unwrap();
    assert!(identity
        .login(&LoginRequest {
            username,
            password: "another1".into(),
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn replied_implies_read() {
    let Some(pool) = test_pool().await else { return };
    let inquiry = InquiryService::new(pool);
    let msg = inquiry
        .submit(&ContactInput {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            subject: format!("Question {}", nonce()),
            message: "Hello".into(),
        })
        .await
        .unwrap();
    assert!(!msg.is_read && !msg.is_replied);

    let replied = inquiry.mark_replied(msg.id).await.unwrap();
    assert!(replied.is_read && replied.is_replied);

    let unread = inquiry
        .list(&MessageQuery {
            is_read: Some(false),
            limit: Some(100),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(unread.items.iter().all(|m| m.id != msg.id));

    inquiry.delete(msg.id).await.unwrap();
    assert!(matches!(inquiry.get(msg.id).await, Err(AppError::NotFound(Resource::Message))));
    assert!(matches!(inquiry.mark_read(msg.id).await, Err(AppError::NotFound(Resource::Message))));
}

#[tokio::test]
async fn paid_order_is_listed_and_counted() {
    let Some(pool) = test_pool().await else { return };
    let donation = DonationService::new(pool);
    let before = donation.stats(Utc::now()).await.unwrap();

    let created = donation
        .create_order(&SponsorRequest {
            amount: 12.5,
            sponsor_name: Some("Patron".into()),
            message: Some("Keep going".into()),
            payment_method: None,
        })
        .await
        .unwrap();
    assert!(created.qr_code.contains(&created.order_id));
    let status = donation.get_status(&created.order_id).await.unwrap();
    assert_eq!(status.status, OrderStatus::Pending);
    assert!(status.paid_at.is_none());

    let result = donation
        .simulate_callback(&created.order_id, CallbackAction::Pay)
        .await
        .unwrap();
    assert_eq!(result.status, OrderStatus::Paid);
    assert!(donation.get_status(&created.order_id).await.unwrap().paid_at.is_some());

    let listed = donation.list_paid(PageRequest::new(None, Some(100), 20)).await.unwrap();
    assert!(listed.items.iter().any(|o| o.order_id == created.order_id));

    let after = donation.stats(Utc::now()).await.unwrap();
    assert_eq!(after.total_count, before.total_count + 1);
    assert_eq!(after.monthly_count, before.monthly_count + 1);
    assert!((after.total_amount - before.total_amount - 12.5).abs() < 1e-9);

    let again = donation.simulate_callback(&created.order_id, CallbackAction::Pay).await;
    assert!(matches!(again, Err(AppError::InvalidTransition { .. })));
}

#[tokio::test]
async fn cancelled_order_cannot_be_paid() {
    let Some(pool) = test_pool().await else { return };
    let donation = DonationService::new(pool);
    let created = donation
        .create_order(&SponsorRequest {
            amount: 3.0,
            sponsor_name: None,
            message: None,
            payment_method: Some("alipay".into()),
        })
        .await
        .unwrap();
    let cancelled = donation
        .simulate_callback(&created.order_id, CallbackAction::Cancel)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let err = donation
        .simulate_callback(&created.order_id, CallbackAction::Pay)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
    let status = donation.get_status(&created.order_id).await.unwrap();
    assert_eq!(status.status, OrderStatus::Cancelled);
    assert!(status.paid_at.is_none());

    assert!(matches!(
        donation.get_status("SP0000000000missing").await,
        Err(AppError::NotFound(Resource::Order))
    ));
}
