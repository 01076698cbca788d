use super::notification::{Notification, NotificationType};
use super::transaction::{Transaction, TransactionStatus};

/// Compound filter over the transaction collection.
///
/// `None` / empty fields do not constrain the result. Adapters backed by a
/// real document database translate this into their native query; the
/// `matches` method is the reference semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub buyer_confirmed: Option<bool>,
    pub status_in: Vec<TransactionStatus>,
}

impl TransactionQuery {
    /// Unconfirmed transactions in a releasable status.
    pub fn release_candidates() -> Self {
        Self {
            buyer_confirmed: Some(false),
            status_in: TransactionStatus::RELEASABLE.to_vec(),
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(confirmed) = self.buyer_confirmed
            && tx.buyer_confirmed != confirmed
        {
            return false;
        }
        self.status_in.is_empty() || self.status_in.contains(&tx.status)
    }
}

/// Equality filter over the notification collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationQuery {
    pub order_id: String,
    pub user_id: String,
    pub r#type: NotificationType,
    pub read: bool,
}

impl NotificationQuery {
    /// Unread issue notifications addressed to the transaction's seller.
    pub fn open_disputes(tx: &Transaction) -> Self {
        Self {
            order_id: tx.order_id.clone(),
            user_id: tx.seller_id.clone(),
            r#type: NotificationType::Issue,
            read: false,
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        notification.order_id == self.order_id
            && notification.user_id == self.user_id
            && notification.r#type == self.r#type
            && notification.read == self.read
    }
}
