use crate::config::LookupFailurePolicy;
use crate::domain::ports::{NotificationStoreBox, TransactionStoreBox};
use crate::domain::query::{NotificationQuery, TransactionQuery};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub enum ExclusionReason {
    /// An unread issue notification addressed to the seller exists.
    OpenDispute,
    /// The dispute lookup itself failed and the run isolates such failures.
    LookupFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub order_id: String,
    pub reason: ExclusionReason,
}

/// Transactions that survived the scan, plus the ones dropped on the way.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub candidates: Vec<Transaction>,
    pub exclusions: Vec<Exclusion>,
}

/// Finds unconfirmed, active transactions that have no open dispute.
pub struct EligibilityScanner {
    transactions: TransactionStoreBox,
    notifications: NotificationStoreBox,
    lookup_failure_policy: LookupFailurePolicy,
    max_concurrency: Option<usize>,
}

impl EligibilityScanner {
    pub fn new(
        transactions: TransactionStoreBox,
        notifications: NotificationStoreBox,
        lookup_failure_policy: LookupFailurePolicy,
        max_concurrency: Option<usize>,
    ) -> Self {
        Self {
            transactions,
            notifications,
            lookup_failure_policy,
            max_concurrency,
        }
    }

    /// Reads the candidate set and filters out disputed orders.
    ///
    /// A failing transaction query always aborts. A failing dispute lookup aborts
    /// or excludes just that order, depending on the configured policy.
    pub async fn scan(&self) -> Result<ScanResult> {
        let found = self
            .transactions
            .query(&TransactionQuery::release_candidates())
            .await?;
        debug!("Found {} release candidates", found.len());

        let limit = self.max_concurrency.unwrap_or(found.len()).max(1);
        let checked: Vec<(Transaction, Result<bool>)> = stream::iter(found)
            .map(|tx| async move {
                let disputed = self
                    .notifications
                    .exists(&NotificationQuery::open_disputes(&tx))
                    .await;
                (tx, disputed)
            })
            .buffered(limit)
            .collect()
            .await;

        let mut result = ScanResult::default();
        for (tx, disputed) in checked {
            match disputed {
                Ok(false) => result.candidates.push(tx),
                Ok(true) => {
                    warn!(
                        order_id = %tx.order_id,
                        seller_id = %tx.seller_id,
                        "Release blocked by unread issue notification"
                    );
                    result.exclusions.push(Exclusion {
                        order_id: tx.order_id,
                        reason: ExclusionReason::OpenDispute,
                    });
                }
                Err(e) => match self.lookup_failure_policy {
                    LookupFailurePolicy::Abort => return Err(e),
                    LookupFailurePolicy::Isolate => {
                        warn!(order_id = %tx.order_id, error = %e, "Dispute lookup failed, excluding order");
                        result.exclusions.push(Exclusion {
                            order_id: tx.order_id,
                            reason: ExclusionReason::LookupFailed(e.to_string()),
                        });
                    }
                },
            }
        }

        Ok(result)
    }
}
