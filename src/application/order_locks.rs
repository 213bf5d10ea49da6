use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per order id.
///
/// Charge and cancel hold the guard across their read, external call and
/// status write, so two operations on the same order run one after the other
/// while operations on different orders proceed in parallel. A slot lives only
/// while some caller holds or waits on it.
#[derive(Default)]
pub struct OrderLocks {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, order_id: &str) -> OrderLockGuard<'_> {
        let slot = {
            let mut slots = self.slots();
            Arc::clone(slots.entry(order_id.to_string()).or_default())
        };
        OrderLockGuard {
            guard: Some(slot.lock_owned().await),
            locks: self,
            order_id: order_id.to_string(),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the slot for `order_id` unless another caller still holds a handle to it.
    fn release(&self, order_id: &str) {
        let mut slots = self.slots();
        if slots
            .get(order_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(order_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots().len()
    }
}

/// Held for the duration of one lifecycle operation on an order.
pub struct OrderLockGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a OrderLocks,
    order_id: String,
}

impl Drop for OrderLockGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own handle no longer counts against the slot.
        drop(self.guard.take());
        self.locks.release(&self.order_id);
    }
}
