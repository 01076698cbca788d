use crate::config::PayoutConfig;
use crate::domain::ports::{PayoutClient, PayoutReceipt, PayoutRequest};
use crate::error::{ReleaseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Default)]
struct PayoutResponseBody {
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Calls the deployed escrow payout function over HTTP.
pub struct HttpPayoutClient {
    config: PayoutConfig,
    client: Client,
}

impl HttpPayoutClient {
    pub fn new(config: PayoutConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl PayoutClient for HttpPayoutClient {
    async fn release(&self, request: &PayoutRequest) -> Result<PayoutReceipt> {
        let mut call = self.client.post(&self.config.url).json(request);
        if let Some(token) = &self.config.api_token {
            call = call.bearer_auth(token);
        }

        let response = call.send().await?;
        let status = response.status();
        let text = response.text().await?;
        // A body that is not JSON is treated as carrying neither field.
        let body: PayoutResponseBody = serde_json::from_str(&text).unwrap_or_default();
        debug!(order_id = %request.order_id, %status, "Payout function responded");

        if status.is_success() {
            Ok(PayoutReceipt {
                signature: body.signature,
            })
        } else {
            Err(ReleaseError::PayoutRejected {
                status: status.as_u16(),
                message: body.error.unwrap_or_else(|| format!("HTTP {}", status)),
            })
        }
    }
}
