use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::AppError;

/// Payment state of a sponsor order.
///
/// `pending --pay--> paid` and `pending --cancel--> cancelled` are the only
/// transitions; `paid`, `cancelled` and `failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Failed,
}

#[derive(Debug, Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
        }
    }

    /// Next status for `action`, or `InvalidTransition` when the order is not pending.
    pub fn apply(self, action: CallbackAction) -> Result<OrderStatus, AppError> {
        match (self, action) {
            (OrderStatus::Pending, CallbackAction::Pay) => Ok(OrderStatus::Paid),
            (OrderStatus::Pending, CallbackAction::Cancel) => Ok(OrderStatus::Cancelled),
            (from, action) => Err(AppError::InvalidTransition {
                from: from.as_str().to_string(),
                action: action.as_str().to_string(),
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "failed" => Ok(OrderStatus::Failed),
            _ => Err(UnknownStatus(s)),
        }
    }
}

/// Simulated provider callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Pay,
    Cancel,
}

impl CallbackAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CallbackAction::Pay => "pay",
            CallbackAction::Cancel => "cancel",
        }
    }
}

impl FromStr for CallbackAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pay" => Ok(CallbackAction::Pay),
            "cancel" => Ok(CallbackAction::Cancel),
            other => Err(AppError::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SponsorOrder {
    #[serde(skip)]
    pub id: i64,
    pub order_id: String,
    pub amount: f64,
    pub sponsor_name: String,
    pub message: String,
    pub payment_method: String,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub qr_code_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorRequest {
    pub amount: f64,
    #[serde(default)]
    pub sponsor_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: String,
    pub qr_code: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusView {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: f64,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResult {
    pub order_id: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SponsorStats {
    pub total_amount: f64,
    pub total_count: i64,
    pub monthly_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_paid_or_cancelled() {
        assert_eq!(OrderStatus::Pending.apply(CallbackAction::Pay).unwrap(), OrderStatus::Paid);
        assert_eq!(
            OrderStatus::Pending.apply(CallbackAction::Cancel).unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn terminal_states_reject_every_action() {
        for from in [OrderStatus::Paid, OrderStatus::Cancelled, OrderStatus::Failed] {
            for action in [CallbackAction::Pay, CallbackAction::Cancel] {
                let err = from.apply(action).unwrap_err();
                assert!(matches!(err, AppError::InvalidTransition { .. }), "{from} {action:?}");
            }
        }
    }

    #[test]
    fn unknown_action_is_invalid_action() {
        assert_eq!("pay".parse::<CallbackAction>().unwrap(), CallbackAction::Pay);
        let err = "refund".parse::<CallbackAction>().unwrap_err();
        assert!(matches!(err, AppError::InvalidAction(a) if a == "refund"));
    }

    #[test]
    fn status_round_trips_through_text() {
        for s in [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Cancelled, OrderStatus::Failed] {
            assert_eq!(OrderStatus::try_from(s.as_str().to_string()).unwrap(), s);
        }
        assert!(OrderStatus::try_from("refunded".to_string()).is_err());
    }
}
