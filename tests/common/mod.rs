#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use escrow_release::ReleaseJob;
use escrow_release::config::{JobConfig, PayoutConfig};
use escrow_release::domain::notification::Notification;
use escrow_release::domain::transaction::{
    Timestamp, Transaction, TransactionStatus, TransactionType,
};
use escrow_release::infrastructure::http_payout::HttpPayoutClient;
use escrow_release::infrastructure::in_memory::{
    InMemoryNotificationStore, InMemoryTransactionStore,
};
use wiremock::MockServer;

pub const PAYOUT_PATH: &str = "/releaseEscrow";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
}

pub fn digital(order_id: &str, created_days_ago: i64) -> Transaction {
    Transaction {
        order_id: order_id.to_string(),
        r#type: TransactionType::Digital,
        status: TransactionStatus::Ordered,
        buyer_confirmed: false,
        delivery_confirmed_at: None,
        created_at: Some(Timestamp::from(now() - Duration::days(created_days_ago))),
        buyer_id: format!("buyer-{order_id}"),
        seller_id: format!("seller-{order_id}"),
    }
}

pub fn rwi(order_id: &str, delivered_days_ago: Option<i64>) -> Transaction {
    Transaction {
        order_id: order_id.to_string(),
        r#type: TransactionType::Rwi,
        status: TransactionStatus::Delivered,
        buyer_confirmed: false,
        delivery_confirmed_at: delivered_days_ago
            .map(|days| Timestamp::from(now() - Duration::days(days))),
        created_at: Some(Timestamp::from(now() - Duration::days(60))),
        buyer_id: format!("buyer-{order_id}"),
        seller_id: format!("seller-{order_id}"),
    }
}

/// An unread issue raised against the order's seller.
pub fn open_issue(tx: &Transaction) -> Notification {
    Notification::issue(tx.order_id.clone(), tx.seller_id.clone())
}

pub fn payout_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), PAYOUT_PATH)
}

/// A job over in-memory stores that pays out through the mock server.
pub fn job_against(
    server: &MockServer,
    transactions: Vec<Transaction>,
    notifications: Vec<Notification>,
    config: JobConfig,
) -> ReleaseJob {
    let payout = HttpPayoutClient::new(PayoutConfig {
        url: payout_url(server),
        api_token: None,
    })
    .unwrap();

    ReleaseJob::new(
        Box::new(InMemoryTransactionStore::with_transactions(transactions)),
        Box::new(InMemoryNotificationStore::with_notifications(notifications)),
        Box::new(payout),
        config,
    )
}
