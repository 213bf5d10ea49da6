use async_trait::async_trait;

use super::errors::{ChargeError, StoreError};
use super::order::{Order, OrderStatus, StatusFilter};

/// Keyed storage of orders. Implementations own the authoritative copy of
/// every order and hand out clones.
pub trait OrderRepository: Send + Sync + 'static {
    /// Insert `order`, generating an id when `order.id` is empty. Returns the id.
    fn insert(&self, order: Order) -> Result<String, StoreError>;
    fn get(&self, id: &str) -> Result<Order, StoreError>;
    fn list(&self, filter: StatusFilter) -> Result<Vec<Order>, StoreError>;
    /// Overwrite the status unconditionally. Transition legality is checked by the caller.
    fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError>;
}

/// External payment gateway. A negative amount is a refund of that magnitude.
#[async_trait]
pub trait ChargeService: Send + Sync + 'static {
    async fn charge(&self, card_token: &str, amount_cents: i64) -> Result<(), ChargeError>;
}
