use super::notification::Notification;
use super::query::{NotificationQuery, TransactionQuery};
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn query(&self, query: &NotificationQuery) -> Result<Vec<Notification>>;

    async fn exists(&self, query: &NotificationQuery) -> Result<bool> {
        Ok(!self.query(query).await?.is_empty())
    }
}

/// Body sent to the payout endpoint for one order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub order_id: String,
    pub buyer_id: String,
}

impl From<&Transaction> for PayoutRequest {
    fn from(tx: &Transaction) -> Self {
        Self {
            order_id: tx.order_id.clone(),
            buyer_id: tx.buyer_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PayoutReceipt {
    #[serde(default)]
    pub signature: Option<String>,
}

/// The external, idempotent escrow payout function.
///
/// Calling it twice for an already released order must not pay twice; the
/// job relies on this to be safely re-run.
#[async_trait]
pub trait PayoutClient: Send + Sync {
    async fn release(&self, request: &PayoutRequest) -> Result<PayoutReceipt>;
}

pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type NotificationStoreBox = Box<dyn NotificationStore>;
pub type PayoutClientBox = Box<dyn PayoutClient>;
