pub mod context;
pub mod order_locks;
pub mod order_service;

pub use context::RequestContext;
pub use order_service::{Cancellation, OrderService};
