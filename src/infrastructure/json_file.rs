use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationStore, TransactionStore};
use crate::domain::query::{NotificationQuery, TransactionQuery};
use crate::domain::transaction::Transaction;
use crate::error::{ReleaseError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Deserialize, Default)]
struct DocumentSnapshot {
    #[serde(default)]
    transactions: Vec<serde_json::Value>,
    #[serde(default)]
    notifications: Vec<serde_json::Value>,
}

/// A document-store snapshot kept in a JSON file.
///
/// The file has the shape `{"transactions": [...], "notifications": [...]}`.
/// Every transaction query re-reads it, so changes written by other processes
/// are seen on the next run. The notifications decoded by that read are kept
/// and serve the dispute lookups that follow, so one run parses the file once
/// no matter how many candidates it checks. Records that do not deserialize
/// are logged and skipped.
///
/// This struct is cheap to clone; clones share the file and the cached
/// notifications.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    notifications: Arc<RwLock<Arc<Vec<Notification>>>>,
}

impl JsonFileStore {
    /// Opens a snapshot file, failing early if it cannot be read or parsed.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            notifications: Arc::default(),
        };
        store.refresh().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<DocumentSnapshot> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ReleaseError::StoreError(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Reads the file and replaces the cached notifications. Returns the
    /// decoded transactions.
    async fn refresh(&self) -> Result<Vec<Transaction>> {
        let snapshot = self.load().await?;
        let notifications: Vec<Notification> =
            decode_records("notifications", snapshot.notifications);
        debug!(
            path = %self.path.display(),
            notifications = notifications.len(),
            "Loaded document snapshot"
        );
        *self.notifications.write().await = Arc::new(notifications);
        Ok(decode_records("transactions", snapshot.transactions))
    }

    async fn cached_notifications(&self) -> Arc<Vec<Notification>> {
        Arc::clone(&*self.notifications.read().await)
    }
}

fn decode_records<T: DeserializeOwned>(collection: &str, values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(collection, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl TransactionStore for JsonFileStore {
    async fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        Ok(self
            .refresh()
            .await?
            .into_iter()
            .filter(|tx| query.matches(tx))
            .collect())
    }
}

#[async_trait]
impl NotificationStore for JsonFileStore {
    async fn query(&self, query: &NotificationQuery) -> Result<Vec<Notification>> {
        Ok(self
            .cached_notifications()
            .await
            .iter()
            .filter(|n| query.matches(n))
            .cloned()
            .collect())
    }

    async fn exists(&self, query: &NotificationQuery) -> Result<bool> {
        Ok(self
            .cached_notifications()
            .await
            .iter()
            .any(|n| query.matches(n)))
    }
}
