mod common;

use common::{digital, now};
use escrow_release::ReleaseJob;
use escrow_release::config::JobConfig;
use escrow_release::domain::ports::{
    NotificationStoreBox, PayoutClient, PayoutClientBox, PayoutReceipt, PayoutRequest,
    TransactionStoreBox,
};
use escrow_release::error::Result;
use escrow_release::infrastructure::in_memory::{
    InMemoryNotificationStore, InMemoryTransactionStore,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Default)]
struct CountingPayout {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl PayoutClient for CountingPayout {
    async fn release(&self, request: &PayoutRequest) -> Result<PayoutReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PayoutReceipt {
            signature: Some(format!("sig-{}", request.order_id)),
        })
    }
}

#[tokio::test]
async fn test_shared_job_runs_from_spawned_tasks() {
    let transactions: TransactionStoreBox = Box::new(InMemoryTransactionStore::with_transactions(
        vec![digital("a", 8), digital("b", 1)],
    ));
    let notifications: NotificationStoreBox = Box::new(InMemoryNotificationStore::new());
    let payout = CountingPayout::default();
    let payout_box: PayoutClientBox = Box::new(payout.clone());

    let job = Arc::new(ReleaseJob::new(
        transactions,
        notifications,
        payout_box,
        JobConfig::default(),
    ));

    // Verify Send + Sync by running the same job from several tasks
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let job = Arc::clone(&job);
            tokio::spawn(async move { job.run_at(now()).await.unwrap() })
        })
        .collect();

    for handle in handles {
        let report = handle.await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.successful, 1);
    }
    assert_eq!(payout.calls.load(Ordering::SeqCst), 4);
}
