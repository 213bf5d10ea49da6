use std::sync::Arc;

use log::{error, info, warn};

use crate::domain::errors::{ChargeError, DomainError};
use crate::domain::order::{
    checked_total_cents, LifecycleAction, NewOrder, Order, OrderStatus, StatusFilter,
};
use crate::domain::ports::{ChargeService, OrderRepository};

use super::context::RequestContext;
use super::order_locks::OrderLocks;

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    pub order_id: String,
    pub refunded_cents: i64,
    pub was_refunded: bool,
}

/// Drives orders through `Pending -> Charged -> Cancelled` and
/// `Pending -> Cancelled`, calling the charge service for charges and refunds.
///
/// Every transition re-reads the order from the repository while holding the
/// per-order lock; the status a caller saw earlier is never trusted.
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    charges: Arc<dyn ChargeService>,
    locks: OrderLocks,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, charges: Arc<dyn ChargeService>) -> Self {
        Self {
            repo,
            charges,
            locks: OrderLocks::new(),
        }
    }

    pub fn create_order(&self, new_order: NewOrder) -> Result<Order, DomainError> {
        let NewOrder {
            id,
            customer_email,
            line_items,
        } = new_order;

        if !customer_email.contains('@') {
            warn!("create_order rejected: invalid customer email");
            return Err(DomainError::InvalidEmail);
        }
        if line_items.is_empty() {
            warn!("create_order rejected: no line items");
            return Err(DomainError::InvalidLineItems(
                "an order must contain at least one line item".to_string(),
            ));
        }
        if let Some(pos) = line_items.iter().position(|li| li.quantity <= 0) {
            warn!("create_order rejected: line item {pos} has non-positive quantity");
            return Err(DomainError::InvalidLineItems(format!(
                "line item {pos} must have a quantity greater than 0"
            )));
        }
        match checked_total_cents(&line_items) {
            Some(total) if total >= 0 => {}
            total => {
                warn!("create_order rejected: total_cents={total:?}");
                return Err(DomainError::InvalidTotal);
            }
        }

        let mut order = Order {
            id: id.unwrap_or_default(),
            customer_email,
            line_items,
            status: OrderStatus::Pending,
        };
        let id = self.repo.insert(order.clone()).map_err(|e| {
            error!("create_order failed: order_id={:?} error={e}", order.id);
            DomainError::from(e)
        })?;
        order.id = id;

        info!(
            "order created: order_id={} total_cents={}",
            order.id,
            order.total_cents()
        );
        Ok(order)
    }

    pub fn get_order(&self, id: &str) -> Result<Order, DomainError> {
        Ok(self.repo.get(id)?)
    }

    /// List orders matching a status token (`""` for all).
    pub fn list_orders(&self, status: &str) -> Result<Vec<Order>, DomainError> {
        let filter: StatusFilter = status.parse()?;
        let orders = self.repo.list(filter)?;
        info!("listed orders: filter={filter:?} count={}", orders.len());
        Ok(orders)
    }

    /// Charge a pending order's total to `card_token`. Returns the amount charged.
    pub async fn charge_order(
        &self,
        ctx: &RequestContext,
        id: &str,
        card_token: &str,
    ) -> Result<i64, DomainError> {
        self.repo.get(id)?;
        let _guard = self.locks.acquire(id).await;

        let order = self.repo.get(id)?;
        let next = order.status.apply(LifecycleAction::Charge).inspect_err(|_| {
            warn!(
                "charge_order rejected: order_id={id} current_status={}",
                order.status
            );
        })?;

        let amount = order.total_cents();
        info!("calling charge service: order_id={id} amount_cents={amount}");
        self.call_charge_service(ctx, card_token, amount)
            .await
            .map_err(|e| {
                error!("charge failed: order_id={id} error={e}");
                DomainError::ChargeService(e.to_string())
            })?;

        // Charge and status write are not atomic: the customer has been charged
        // at this point even if the write below fails.
        self.repo.set_status(id, next).map_err(|e| {
            error!(
                "order charged but status not persisted: order_id={id} amount_cents={amount} error={e}"
            );
            DomainError::Internal(format!("error updating order to charged: {e}"))
        })?;

        info!("order charged: order_id={id} charged_cents={amount}");
        Ok(amount)
    }

    /// Cancel a pending or charged order, refunding charged orders first.
    pub async fn cancel_order(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Cancellation, DomainError> {
        self.repo.get(id)?;
        let _guard = self.locks.acquire(id).await;

        let order = self.repo.get(id)?;
        let next = order.status.apply(LifecycleAction::Cancel).inspect_err(|_| {
            warn!(
                "cancel_order rejected: order_id={id} current_status={} terminal={}",
                order.status,
                order.status.is_terminal()
            );
        })?;

        let was_refunded = order.status == OrderStatus::Charged;
        let refunded_cents = if was_refunded {
            let total = order.total_cents();
            info!("refunding charged order: order_id={id} amount_cents={}", -total);
            // The card token of the original charge is not retained.
            self.call_charge_service(ctx, "", -total)
                .await
                .map_err(|e| {
                    error!("refund failed: order_id={id} error={e}");
                    DomainError::ChargeService(format!("error processing refund: {e}"))
                })?;
            total
        } else {
            0
        };

        self.repo.set_status(id, next).map_err(|e| {
            error!("cancel_order failed to persist: order_id={id} refunded={was_refunded} error={e}");
            DomainError::Internal(format!("error cancelling order: {e}"))
        })?;

        info!("order cancelled: order_id={id} refunded_cents={refunded_cents}");
        Ok(Cancellation {
            order_id: order.id,
            refunded_cents,
            was_refunded,
        })
    }

    async fn call_charge_service(
        &self,
        ctx: &RequestContext,
        card_token: &str,
        amount_cents: i64,
    ) -> Result<(), ChargeError> {
        ctx.run(self.charges.charge(card_token, amount_cents))
            .await
            .map_err(|_| ChargeError::DeadlineExceeded)?
    }
}
