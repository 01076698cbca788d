use crate::domain::ports::{PayoutClientBox, PayoutRequest};
use crate::domain::transaction::Transaction;
use crate::error::ReleaseError;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one payout call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Released {
        order_id: String,
        signature: Option<String>,
    },
    Failed {
        order_id: String,
        error: String,
    },
}

impl DispatchOutcome {
    pub fn order_id(&self) -> &str {
        match self {
            DispatchOutcome::Released { order_id, .. } | DispatchOutcome::Failed { order_id, .. } => {
                order_id
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Released { .. })
    }
}

/// Fires one payout call per eligible transaction and waits for all of them.
///
/// Calls are never retried within a run; an unreleased order stays eligible and
/// is picked up again by the next invocation.
pub struct PayoutDispatcher {
    client: PayoutClientBox,
    call_timeout: Duration,
    max_concurrency: Option<usize>,
}

impl PayoutDispatcher {
    pub fn new(client: PayoutClientBox, call_timeout: Duration, max_concurrency: Option<usize>) -> Self {
        Self {
            client,
            call_timeout,
            max_concurrency,
        }
    }

    /// Dispatches the batch. Outcomes come back in the same order as `eligible`.
    pub async fn dispatch(&self, eligible: Vec<Transaction>) -> Vec<DispatchOutcome> {
        let limit = self.max_concurrency.unwrap_or(eligible.len()).max(1);
        stream::iter(eligible)
            .map(|tx| self.dispatch_one(tx))
            .buffered(limit)
            .collect()
            .await
    }

    async fn dispatch_one(&self, tx: Transaction) -> DispatchOutcome {
        let request = PayoutRequest::from(&tx);
        let result = tokio::time::timeout(self.call_timeout, self.client.release(&request))
            .await
            .unwrap_or(Err(ReleaseError::Timeout(self.call_timeout)));

        match result {
            Ok(receipt) => {
                info!(
                    order_id = %request.order_id,
                    signature = receipt.signature.as_deref().unwrap_or("-"),
                    "Released escrow"
                );
                DispatchOutcome::Released {
                    order_id: request.order_id,
                    signature: receipt.signature,
                }
            }
            Err(e) => {
                warn!(order_id = %request.order_id, error = %e, "Escrow release failed");
                DispatchOutcome::Failed {
                    order_id: request.order_id,
                    error: e.to_string(),
                }
            }
        }
    }
}
