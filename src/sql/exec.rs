//! Run a [`QueryBuf`] pair produced by the builder.

use crate::error::AppError;
use crate::sql::builder::QueryBuf;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

pub async fn fetch_all<T>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn fetch_count(pool: &PgPool, q: &QueryBuf) -> Result<i64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_one(pool).await?)
}

/// Rows for one page plus the unpaginated total.
pub async fn fetch_page<T>(pool: &PgPool, list: &QueryBuf, count: &QueryBuf) -> Result<(Vec<T>, i64), AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let total = fetch_count(pool, count).await?;
    let rows = fetch_all(pool, list).await?;
    Ok((rows, total))
}
