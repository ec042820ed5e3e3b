//! Donation component: pending orders, the simulated provider callback, paid list, stats.
//!
//! The callback simulator stands in for a real payment provider's webhook. Replacing it
//! means verifying the provider's notification instead; the status machine stays the same.

use crate::error::{AppError, Resource};
use crate::models::{
    CallbackAction, CallbackResult, OrderCreated, OrderStatus, OrderStatusView, SponsorOrder, SponsorRequest,
    SponsorStats,
};
use crate::response::Page;
use crate::service::pagination::PageRequest;
use crate::service::validation::{non_empty, RequestValidator};
use crate::sql::{fetch_page, Filter, Sort};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, order_id, amount, sponsor_name, message, payment_method, status, \
                             qr_code_url, transaction_id, paid_at, created_at, updated_at";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SPONSOR_NAME: &str = "anonymous";
pub const DEFAULT_PAYMENT_METHOD: &str = "wechat";
const QR_BASE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// `SP<unix_ts><8 hex>`.
pub fn generate_order_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("SP{}{}", now.timestamp(), &random[..8])
}

/// 32 hex chars from a v4 UUID: 16 bytes, of which 122 bits are random.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Placeholder payment QR reference. Opaque to callers.
pub fn mock_qr_code(order_id: &str, amount: f64) -> String {
    format!("{}?size=200x200&data=mock_payment_{}_{:.2}", QR_BASE_URL, order_id, amount)
}

/// First instant of `now`'s calendar month (UTC).
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Normalized fields for a new order.
#[derive(Debug, PartialEq)]
pub struct NewOrder {
    pub amount: f64,
    pub sponsor_name: String,
    pub message: String,
    pub payment_method: String,
}

pub fn validate_order(req: &SponsorRequest) -> Result<NewOrder, AppError> {
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(AppError::Validation("amount must be greater than 0".into()));
    }
    let sponsor_name = non_empty(req.sponsor_name.as_deref()).unwrap_or(DEFAULT_SPONSOR_NAME);
    RequestValidator::max_length("sponsorName", sponsor_name, 100)?;
    let payment_method = non_empty(req.payment_method.as_deref()).unwrap_or(DEFAULT_PAYMENT_METHOD);
    RequestValidator::max_length("paymentMethod", payment_method, 20)?;
    Ok(NewOrder {
        amount: req.amount,
        sponsor_name: sponsor_name.to_string(),
        message: req.message.as_deref().unwrap_or("").trim().to_string(),
        payment_method: payment_method.to_string(),
    })
}

#[derive(Clone)]
pub struct DonationService {
    pool: PgPool,
}

impl DonationService {
    pub fn new(pool: PgPool) -> Self {
        DonationService { pool }
    }

    /// Insert a pending order with its QR reference already attached.
    pub async fn create_order(&self, req: &SponsorRequest) -> Result<OrderCreated, AppError> {
        let order = validate_order(req)?;
        let order_id = generate_order_id(Utc::now());
        let qr_code = mock_qr_code(&order_id, order.amount);
        sqlx::query(
            r#"
            INSERT INTO sponsor_orders (order_id, amount, sponsor_name, message, payment_method, status, qr_code_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&order_id)
        .bind(order.amount)
        .bind(&order.sponsor_name)
        .bind(&order.message)
        .bind(&order.payment_method)
        .bind(OrderStatus::Pending.as_str())
        .bind(&qr_code)
        .execute(&self.pool)
        .await?;
        tracing::info!(order_id = %order_id, amount = order.amount, "sponsor order created");
        Ok(OrderCreated {
            order_id,
            qr_code,
            amount: order.amount,
        })
    }

    pub async fn get_status(&self, order_id: &str) -> Result<OrderStatusView, AppError> {
        let order = self.find(order_id).await?;
        Ok(OrderStatusView {
            order_id: order.order_id,
            status: order.status,
            amount: order.amount,
            paid_at: order.paid_at,
        })
    }

    /// Apply `pay` or `cancel` to a pending order. Any other state is rejected untouched.
    pub async fn simulate_callback(&self, order_id: &str, action: CallbackAction) -> Result<CallbackResult, AppError> {
        let order = self.find(order_id).await?;
        let next = order.status.apply(action)?;
        let updated: Option<SponsorOrder> = match next {
            OrderStatus::Paid => {
                sqlx::query_as(&format!(
                    r#"
                    UPDATE sponsor_orders
                    SET status = $2, paid_at = NOW(), transaction_id = $3, updated_at = NOW()
                    WHERE order_id = $1 AND status = $4
                    RETURNING {}
                    "#,
                    ORDER_COLUMNS
                ))
                .bind(order_id)
                .bind(OrderStatus::Paid.as_str())
                .bind(generate_transaction_id())
                .bind(OrderStatus::Pending.as_str())
                .fetch_optional(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as(&format!(
                    r#"
                    UPDATE sponsor_orders
                    SET status = $2, updated_at = NOW()
                    WHERE order_id = $1 AND status = $3
                    RETURNING {}
                    "#,
                    ORDER_COLUMNS
                ))
                .bind(order_id)
                .bind(next.as_str())
                .bind(OrderStatus::Pending.as_str())
                .fetch_optional(&self.pool)
                .await?
            }
        };
        let Some(updated) = updated else {
            // Another callback settled the order between our read and write.
            let current = self.find(order_id).await?;
            return Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                action: action.as_str().to_string(),
            });
        };
        tracing::info!(order_id = %updated.order_id, status = %updated.status, "sponsor order settled");
        Ok(CallbackResult {
            order_id: updated.order_id,
            status: updated.status,
        })
    }

    /// Paid orders, most recently paid first.
    pub async fn list_paid(&self, page: PageRequest) -> Result<Page<SponsorOrder>, AppError> {
        let sort = Sort {
            column: "paid_at",
            descending: true,
            nulls_last: true,
        };
        let (list, count) = Filter::new()
            .eq("status", OrderStatus::Paid.as_str())
            .into_page_queries("sponsor_orders", ORDER_COLUMNS, &sort, &page);
        let (rows, total) = fetch_page(&self.pool, &list, &count).await?;
        Ok(page.into_page(rows, total))
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<SponsorStats, AppError> {
        let (total_amount, total_count, monthly_count): (f64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)::float8,
                   COUNT(*),
                   COUNT(*) FILTER (WHERE paid_at >= $2)
            FROM sponsor_orders
            WHERE status = $1
            "#,
        )
        .bind(OrderStatus::Paid.as_str())
        .bind(month_start(now))
        .fetch_one(&self.pool)
        .await?;
        Ok(SponsorStats {
            total_amount,
            total_count,
            monthly_count,
        })
    }

    async fn find(&self, order_id: &str) -> Result<SponsorOrder, AppError> {
        let order: Option<SponsorOrder> = sqlx::query_as(&format!(
            "SELECT {} FROM sponsor_orders WHERE order_id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        order.ok_or(AppError::NotFound(Resource::Order))
    }
}
