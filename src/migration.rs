//! Idempotent schema ensure: CREATE ... IF NOT EXISTS for every table and index. Run once at startup.

use crate::error::AppError;
use sqlx::PgPool;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(50) NOT NULL UNIQUE,
        email VARCHAR(100) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        role VARCHAR(20) NOT NULL DEFAULT 'admin',
        avatar VARCHAR(500) NOT NULL DEFAULT '',
        bio VARCHAR(500) NOT NULL DEFAULT '',
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        content TEXT NOT NULL,
        excerpt TEXT NOT NULL DEFAULT '',
        slug VARCHAR(200) NOT NULL UNIQUE,
        author VARCHAR(100) NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        cover_image VARCHAR(500) NOT NULL DEFAULT '',
        published BOOLEAN NOT NULL DEFAULT FALSE,
        read_time INTEGER NOT NULL DEFAULT 1 CHECK (read_time >= 1),
        view_count BIGINT NOT NULL DEFAULT 0 CHECK (view_count >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_posts_deleted_at ON posts (deleted_at)",
    "CREATE INDEX IF NOT EXISTS idx_posts_published_created ON posts (published, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS contact_messages (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL,
        subject VARCHAR(200) NOT NULL,
        message TEXT NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        is_replied BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK (NOT is_replied OR is_read)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sponsor_orders (
        id BIGSERIAL PRIMARY KEY,
        order_id VARCHAR(100) NOT NULL UNIQUE,
        amount DOUBLE PRECISION NOT NULL CHECK (amount > 0),
        sponsor_name VARCHAR(100) NOT NULL DEFAULT 'anonymous',
        message TEXT NOT NULL DEFAULT '',
        payment_method VARCHAR(20) NOT NULL DEFAULT 'wechat',
        status VARCHAR(20) NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'paid', 'cancelled', 'failed')),
        qr_code_url VARCHAR(500) NOT NULL DEFAULT '',
        transaction_id VARCHAR(100),
        paid_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK ((status = 'paid') = (paid_at IS NOT NULL))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sponsor_orders_status_paid_at ON sponsor_orders (status, paid_at DESC)",
];

/// Arbitrary key for the session-level advisory lock held while the DDL runs.
const SCHEMA_LOCK_KEY: i64 = 0x626c_6f67;

/// Ensure all tables and indexes exist. Safe to run on every start, including from
/// several processes at once: concurrent callers wait on an advisory lock.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    tracing::info!("ensuring database schema");
    let mut conn = pool.acquire().await?;
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await?;
    let mut result = Ok(());
    for ddl in DDL {
        if let Err(e) = sqlx::query(*ddl).execute(&mut *conn).await {
            result = Err(e);
            break;
        }
    }
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await?;
    result?;
    tracing::info!(statements = DDL.len(), "database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DDL;

    #[test]
    fn every_statement_is_rerunnable() {
        for ddl in DDL {
            assert!(ddl.contains("IF NOT EXISTS"), "{ddl}");
        }
    }
}
