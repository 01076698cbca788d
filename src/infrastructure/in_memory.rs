use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationStore, TransactionStore};
use crate::domain::query::{NotificationQuery, TransactionQuery};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory transaction collection.
///
/// Preserves insertion order so query results are deterministic. Inserting a
/// transaction with an existing `order_id` replaces it in place.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Arc::new(RwLock::new(transactions)),
        }
    }

    pub async fn insert(&self, tx: Transaction) {
        let mut transactions = self.transactions.write().await;
        match transactions.iter_mut().find(|t| t.order_id == tx.order_id) {
            Some(existing) => *existing = tx,
            None => transactions.push(tx),
        }
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|tx| query.matches(tx))
            .cloned()
            .collect())
    }
}

/// A thread-safe in-memory notification collection.
#[derive(Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationStore {
    /// Creates a new, empty in-memory notification store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(notifications: Vec<Notification>) -> Self {
        Self {
            notifications: Arc::new(RwLock::new(notifications)),
        }
    }

    pub async fn insert(&self, notification: Notification) {
        self.notifications.write().await.push(notification);
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn query(&self, query: &NotificationQuery) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| query.matches(n))
            .cloned()
            .collect())
    }

    async fn exists(&self, query: &NotificationQuery) -> Result<bool> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().any(|n| query.matches(n)))
    }
}
