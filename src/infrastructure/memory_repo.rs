use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::rngs::OsRng;
use rand::Rng;

use crate::domain::errors::StoreError;
use crate::domain::order::{Order, OrderStatus, StatusFilter};
use crate::domain::ports::OrderRepository;

/// Random 128-bit order id rendered as 32 lowercase hex characters.
pub fn generate_order_id() -> String {
    format!("{:032x}", OsRng.gen::<u128>())
}

/// Orders kept in a `HashMap` behind a single reader/writer lock.
///
/// Reads share the lock, inserts and status writes take it exclusively, so a
/// reader sees either the old or the new status of an order and a listing is a
/// consistent snapshot.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Order>>, StoreError> {
        self.orders
            .read()
            .map_err(|e| StoreError::Internal(format!("order store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Order>>, StoreError> {
        self.orders
            .write()
            .map_err(|e| StoreError::Internal(format!("order store lock poisoned: {e}")))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, mut order: Order) -> Result<String, StoreError> {
        if order.id.is_empty() {
            order.id = generate_order_id();
        }

        let mut orders = self.write()?;
        if orders.contains_key(&order.id) {
            return Err(StoreError::AlreadyExists);
        }
        let id = order.id.clone();
        orders.insert(id.clone(), order);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Order, StoreError> {
        self.read()?.get(id).cloned().ok_or(StoreError::NotFound)
    }

    fn list(&self, filter: StatusFilter) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|o| filter.matches(o.status))
            .cloned()
            .collect())
    }

    fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError> {
        let mut orders = self.write()?;
        let order = orders.get_mut(id).ok_or(StoreError::NotFound)?;
        order.status = status;
        Ok(())
    }
}
