use super::transaction::{Transaction, TransactionType, normalize_timestamp};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Why a transaction could not be evaluated at all.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// `rwi` order without a usable `deliveryConfirmedAt`.
    MissingDeliveryConfirmation,
    /// `digital` order without a usable `createdAt`.
    MissingCreatedAt,
    UnsupportedType,
    /// The release date would fall outside the representable range.
    ReleaseDateOutOfRange,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReleaseDecision {
    Eligible { release_at: DateTime<Utc> },
    NotYetDue { release_at: DateTime<Utc> },
    Skipped(SkipReason),
}

impl ReleaseDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, ReleaseDecision::Eligible { .. })
    }
}

/// Decides when escrowed funds for a transaction may be paid out.
///
/// The reference instant is the delivery confirmation for real-world items and
/// the creation time for digital goods. Funds release once `hold_period` has
/// elapsed since that instant, boundary inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePolicy {
    hold_period: Duration,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self::new(Duration::days(7))
    }
}

impl ReleasePolicy {
    pub fn new(hold_period: Duration) -> Self {
        Self { hold_period }
    }

    pub fn hold_period(&self) -> Duration {
        self.hold_period
    }

    /// Returns the instant the transaction's funds become releasable, or why
    /// none can be computed.
    pub fn release_date(&self, tx: &Transaction) -> Result<DateTime<Utc>, SkipReason> {
        let reference = match tx.r#type {
            TransactionType::Rwi => tx
                .delivery_confirmed_at
                .as_ref()
                .and_then(normalize_timestamp)
                .ok_or(SkipReason::MissingDeliveryConfirmation)?,
            TransactionType::Digital => tx
                .created_at
                .as_ref()
                .and_then(normalize_timestamp)
                .ok_or(SkipReason::MissingCreatedAt)?,
            TransactionType::Unknown => return Err(SkipReason::UnsupportedType),
        };
        reference
            .checked_add_signed(self.hold_period)
            .ok_or(SkipReason::ReleaseDateOutOfRange)
    }

    pub fn evaluate(&self, tx: &Transaction, now: DateTime<Utc>) -> ReleaseDecision {
        match self.release_date(tx) {
            Ok(release_at) if now >= release_at => ReleaseDecision::Eligible { release_at },
            Ok(release_at) => ReleaseDecision::NotYetDue { release_at },
            Err(reason) => ReleaseDecision::Skipped(reason),
        }
    }
}
