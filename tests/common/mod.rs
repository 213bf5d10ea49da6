#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use order_up::domain::errors::ChargeError;
use order_up::domain::ports::ChargeService;
use order_up::infrastructure::InMemoryOrderRepository;
use order_up::AppState;

/// Charge service double that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingCharges {
    calls: Mutex<Vec<(String, i64)>>,
    failure: Mutex<Option<String>>,
}

impl RecordingCharges {
    pub fn calls(&self) -> Vec<(String, i64)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, body: &str) {
        *self.failure.lock().unwrap() = Some(body.to_string());
    }
}

#[async_trait]
impl ChargeService for RecordingCharges {
    async fn charge(&self, card_token: &str, amount_cents: i64) -> Result<(), ChargeError> {
        self.calls
            .lock()
            .unwrap()
            .push((card_token.to_string(), amount_cents));
        match self.failure.lock().unwrap().clone() {
            Some(body) => Err(ChargeError::Rejected { status: 502, body }),
            None => Ok(()),
        }
    }
}

pub fn app_state(charges: Arc<RecordingCharges>) -> AppState {
    AppState::new(
        Arc::new(InMemoryOrderRepository::new()),
        charges,
        Duration::from_secs(5),
    )
}

/// Bind to port 0 to let the OS assign a free port, then release it.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}
