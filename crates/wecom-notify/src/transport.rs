use crate::error::TransportError;
use crate::utils::{truncate_string, MAX_BODY_LENGTH};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Delivers a serialized JSON body to a webhook URL and waits for the outcome.
///
/// Implementations make a single attempt; retrying is the caller's decision.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn send_sync(&self, url: &str, body: &str) -> Result<(), TransportError>;
}

/// [`WebhookTransport`] backed by a shared `reqwest` client.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a transport whose requests fail after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn send_sync(&self, url: &str, body: &str) -> Result<(), TransportError> {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: truncate_string(&text, MAX_BODY_LENGTH),
            });
        }

        // The robot API reports failures in the body with a 200 status.
        let Ok(reply) = serde_json::from_str::<Value>(&text) else {
            tracing::debug!(status = %status, "WeCom webhook reply is not JSON");
            return Ok(());
        };
        match reply.get("errcode").and_then(Value::as_i64) {
            Some(0) | None => Ok(()),
            Some(code) => Err(TransportError::Api {
                code,
                message: reply
                    .get("errmsg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
            }),
        }
    }
}
