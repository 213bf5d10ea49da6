use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::errors::DomainError;

/// Lifecycle status of an order.
///
/// The discriminants are part of the wire contract: a status is serialized as
/// its ordinal integer, not its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum OrderStatus {
    Pending = 0,
    Charged = 1,
    Fulfilled = 2,
    Cancelled = 3,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status ordinal {0}")]
pub struct UnknownStatus(pub i32);

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> Self {
        status as i32
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = UnknownStatus;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderStatus::Pending),
            1 => Ok(OrderStatus::Charged),
            2 => Ok(OrderStatus::Fulfilled),
            3 => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Charged => "charged",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Fulfilled | OrderStatus::Cancelled)
    }

    /// Resolve the status an order moves to when `action` is applied.
    ///
    /// Only three edges are reachable from this crate: `Pending -> Charged`,
    /// `Pending -> Cancelled` and `Charged -> Cancelled`. `Charged -> Fulfilled`
    /// belongs to the fulfillment system.
    pub fn apply(self, action: LifecycleAction) -> Result<OrderStatus, DomainError> {
        match (self, action) {
            (OrderStatus::Pending, LifecycleAction::Charge) => Ok(OrderStatus::Charged),
            (OrderStatus::Pending | OrderStatus::Charged, LifecycleAction::Cancel) => {
                Ok(OrderStatus::Cancelled)
            }
            (status, action) => Err(DomainError::NotEligible(format!(
                "order in status {status} cannot be {}",
                action.past_tense()
            ))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Charge,
    Cancel,
}

impl LifecycleAction {
    fn past_tense(self) -> &'static str {
        match self {
            LifecycleAction::Charge => "charged",
            LifecycleAction::Cancel => "cancelled",
        }
    }
}

/// Query filter for listing orders. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    /// An empty token means "no filter".
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Only(OrderStatus::Pending)),
            "charged" => Ok(StatusFilter::Only(OrderStatus::Charged)),
            "fulfilled" => Ok(StatusFilter::Only(OrderStatus::Fulfilled)),
            "cancelled" => Ok(StatusFilter::Only(OrderStatus::Cancelled)),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    /// Negative prices represent discounts.
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl LineItem {
    pub fn checked_subtotal_cents(&self) -> Option<i64> {
        self.unit_price_cents.checked_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_email: String,
    pub line_items: Vec<LineItem>,
    #[schema(value_type = i32, minimum = 0, maximum = 3)]
    pub status: OrderStatus,
}

impl Order {
    /// Sum of `unit_price_cents * quantity` over every line item.
    ///
    /// Saturates instead of overflowing; orders admitted through
    /// `OrderService::create_order` are checked with [`checked_total_cents`].
    pub fn total_cents(&self) -> i64 {
        self.line_items.iter().fold(0i64, |acc, item| {
            acc.saturating_add(item.unit_price_cents.saturating_mul(item.quantity))
        })
    }
}

/// Total of `items`, or `None` if it does not fit in an `i64`.
pub fn checked_total_cents(items: &[LineItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0i64, |acc, item| acc.checked_add(item.checked_subtotal_cents()?))
}

/// Input to order creation. An absent or empty `id` is generated by the store.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub id: Option<String>,
    pub customer_email: String,
    pub line_items: Vec<LineItem>,
}
