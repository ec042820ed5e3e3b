//! Persistence gateway bootstrap: database creation, pool, admin seed, health counts.

use crate::config::{AdminSeed, DatabaseSettings};
use crate::error::AppError;
use crate::models::ROLE_ADMIN;
use crate::service::identity::hash_password;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

/// Ensure the database named in `options` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), AppError> {
    let db_name = options.get_database().unwrap_or("").to_string();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let admin_opts = options.clone().database("postgres");
    let mut conn: sqlx::PgConnection = admin_opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Open the pool. Failure here is fatal for the process.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, AppError> {
    let options = settings.connect_options()?;
    ensure_database_exists(&options).await?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await?;
    tracing::info!("database connected");
    Ok(pool)
}

/// Create the bootstrap admin if no admin exists yet. Returns true when a row was inserted.
pub async fn seed_admin(pool: &PgPool, seed: &AdminSeed) -> Result<bool, AppError> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE role = $1 LIMIT 1")
        .bind(ROLE_ADMIN)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        tracing::debug!("admin user already exists");
        return Ok(false);
    }
    let hash = hash_password(&seed.password).await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, role, bio, active)
        VALUES ($1, $2, $3, $4, 'site administrator', TRUE)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&seed.username)
    .bind(&seed.email)
    .bind(&hash)
    .bind(ROLE_ADMIN)
    .execute(pool)
    .await?
    .rows_affected()
        > 0;
    if inserted {
        tracing::info!(username = %seed.username, "default admin user created; change its password");
    }
    Ok(inserted)
}

/// Row counts reported by the health check.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct StoreCounts {
    pub posts: i64,
    pub messages: i64,
}

pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(error = %e, "database ping failed");
            AppError::Unavailable
        })
}

pub async fn counts(pool: &PgPool) -> Result<StoreCounts, AppError> {
    let (posts, messages): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM posts WHERE deleted_at IS NULL), (SELECT COUNT(*) FROM contact_messages)",
    )
    .fetch_one(pool)
    .await?;
    Ok(StoreCounts { posts, messages })
}
