use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::domain::errors::ChargeError;
use crate::domain::ports::ChargeService;

/// Body of `POST /charge` on the charge service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest<'a> {
    pub card_token: &'a str,
    pub amount_cents: i64,
}

/// [`ChargeService`] backed by the external charge service's HTTP API.
///
/// The service answers `201 Created` for an accepted charge or refund; any
/// other status is reported as [`ChargeError::Rejected`] with whatever body
/// could be read.
pub struct HttpChargeService {
    client: reqwest::Client,
    charge_url: String,
}

impl HttpChargeService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            charge_url: format!("{}/charge", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ChargeService for HttpChargeService {
    async fn charge(&self, card_token: &str, amount_cents: i64) -> Result<(), ChargeError> {
        let resp = self
            .client
            .post(&self.charge_url)
            .json(&ChargeRequest {
                card_token,
                amount_cents,
            })
            .send()
            .await
            .map_err(|e| ChargeError::Transport(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChargeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
