use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Per-request deadline, threaded into every lifecycle operation that calls out
/// to the charge service.
///
/// Cancellation by the caller (client disconnect) is handled by dropping the
/// request future, which drops any in-flight call along with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Drive `fut` to completion unless the deadline passes first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, DeadlineExceeded> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}
