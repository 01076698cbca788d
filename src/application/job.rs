use super::dispatcher::{DispatchOutcome, PayoutDispatcher};
use super::report::ReleaseReport;
use super::scanner::{EligibilityScanner, ExclusionReason};
use crate::config::JobConfig;
use crate::domain::policy::{ReleaseDecision, ReleasePolicy, SkipReason};
use crate::domain::ports::{NotificationStoreBox, PayoutClientBox, TransactionStoreBox};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

/// Where a scanned transaction ended up in this run.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "state")]
pub enum TransactionOutcome {
    Excluded { reason: ExclusionReason },
    Skipped { reason: SkipReason },
    NotYetDue { release_at: DateTime<Utc> },
    Released { signature: Option<String> },
    DispatchFailed { error: String },
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub order_id: String,
    #[serde(flatten)]
    pub outcome: TransactionOutcome,
}

/// Full account of one run. Only `report` is ever returned to callers of the
/// HTTP trigger; the entries are for logs and diagnostics.
#[derive(Debug, Default)]
pub struct RunLedger {
    pub entries: Vec<LedgerEntry>,
    pub report: ReleaseReport,
}

impl RunLedger {
    pub fn outcome_of(&self, order_id: &str) -> Option<&TransactionOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.order_id == order_id)
            .map(|entry| &entry.outcome)
    }
}

/// An eligible transaction as reported by a dry run.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PendingRelease {
    pub order_id: String,
    pub buyer_id: String,
    pub release_at: DateTime<Utc>,
}

struct Evaluation {
    eligible: Vec<(Transaction, DateTime<Utc>)>,
    entries: Vec<LedgerEntry>,
}

/// The escrow release run: scan, evaluate, dispatch, aggregate.
///
/// Holds no state between runs. Store and payout handles are injected once and
/// reused for every invocation.
pub struct ReleaseJob {
    scanner: EligibilityScanner,
    policy: ReleasePolicy,
    dispatcher: PayoutDispatcher,
}

impl ReleaseJob {
    /// Creates a new `ReleaseJob` instance.
    ///
    /// # Arguments
    ///
    /// * `transactions` - The store holding escrowed orders.
    /// * `notifications` - The store holding dispute notifications.
    /// * `payout` - Client for the external payout function.
    /// * `config` - Hold period, concurrency and timeout settings.
    pub fn new(
        transactions: TransactionStoreBox,
        notifications: NotificationStoreBox,
        payout: PayoutClientBox,
        config: JobConfig,
    ) -> Self {
        Self {
            scanner: EligibilityScanner::new(
                transactions,
                notifications,
                config.lookup_failure_policy,
                config.max_concurrency,
            ),
            policy: config.policy,
            dispatcher: PayoutDispatcher::new(payout, config.call_timeout, config.max_concurrency),
        }
    }

    pub async fn run(&self) -> Result<ReleaseReport> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<ReleaseReport> {
        Ok(self.run_detailed_at(now).await?.report)
    }

    /// Runs the release pass as of `now` and returns every per-transaction outcome.
    pub async fn run_detailed_at(&self, now: DateTime<Utc>) -> Result<RunLedger> {
        let Evaluation {
            eligible,
            mut entries,
        } = self.evaluate(now).await?;

        let batch: Vec<Transaction> = eligible.into_iter().map(|(tx, _)| tx).collect();
        let outcomes = self.dispatcher.dispatch(batch).await;
        let report = ReleaseReport::from_outcomes(&outcomes);

        entries.extend(outcomes.into_iter().map(|outcome| match outcome {
            DispatchOutcome::Released {
                order_id,
                signature,
            } => LedgerEntry {
                order_id,
                outcome: TransactionOutcome::Released { signature },
            },
            DispatchOutcome::Failed { order_id, error } => LedgerEntry {
                order_id,
                outcome: TransactionOutcome::DispatchFailed { error },
            },
        }));

        info!(
            scanned = entries.len(),
            processed = report.processed,
            successful = report.successful,
            failed = report.failed.len(),
            "Escrow release run complete"
        );

        Ok(RunLedger { entries, report })
    }

    /// Lists what a run at `now` would dispatch, without calling the payout function.
    pub async fn preview_at(&self, now: DateTime<Utc>) -> Result<Vec<PendingRelease>> {
        let evaluation = self.evaluate(now).await?;
        Ok(evaluation
            .eligible
            .into_iter()
            .map(|(tx, release_at)| PendingRelease {
                order_id: tx.order_id,
                buyer_id: tx.buyer_id,
                release_at,
            })
            .collect())
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> Result<Evaluation> {
        let scan = self
            .scanner
            .scan()
            .await
            .inspect_err(|e| error!(error = %e, "Escrow release scan failed, aborting run"))?;

        let mut entries: Vec<LedgerEntry> = scan
            .exclusions
            .into_iter()
            .map(|exclusion| LedgerEntry {
                order_id: exclusion.order_id,
                outcome: TransactionOutcome::Excluded {
                    reason: exclusion.reason,
                },
            })
            .collect();
        let mut eligible = Vec::new();

        for tx in scan.candidates {
            match self.policy.evaluate(&tx, now) {
                ReleaseDecision::Eligible { release_at } => {
                    debug!(order_id = %tx.order_id, %release_at, "Eligible for release");
                    eligible.push((tx, release_at));
                }
                ReleaseDecision::NotYetDue { release_at } => {
                    debug!(order_id = %tx.order_id, %release_at, "Not yet due");
                    entries.push(LedgerEntry {
                        order_id: tx.order_id,
                        outcome: TransactionOutcome::NotYetDue { release_at },
                    });
                }
                ReleaseDecision::Skipped(reason) => {
                    debug!(order_id = %tx.order_id, ?reason, "Skipped");
                    entries.push(LedgerEntry {
                        order_id: tx.order_id,
                        outcome: TransactionOutcome::Skipped { reason },
                    });
                }
            }
        }

        Ok(Evaluation { eligible, entries })
    }
}
