use crate::domain::policy::ReleasePolicy;
use crate::error::{ReleaseError, Result};
use chrono::Duration as HoldPeriod;
use clap::ValueEnum;
use std::time::Duration;

pub const DEFAULT_HOLD_DAYS: i64 = 7;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do when a dispute lookup for a single candidate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LookupFailurePolicy {
    /// Abort the whole run and report a server error.
    #[default]
    Abort,
    /// Exclude only the affected transaction and keep going.
    Isolate,
}

/// Tunables for one release run.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub policy: ReleasePolicy,
    /// Upper bound on in-flight store lookups and payout calls. `None` fans out
    /// the whole batch at once.
    pub max_concurrency: Option<usize>,
    pub call_timeout: Duration,
    pub lookup_failure_policy: LookupFailurePolicy,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            policy: ReleasePolicy::default(),
            max_concurrency: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            lookup_failure_policy: LookupFailurePolicy::default(),
        }
    }
}

impl JobConfig {
    /// Builds a config from raw operator input, rejecting values that would make
    /// the job misbehave.
    pub fn from_parts(
        hold_days: i64,
        max_concurrency: Option<usize>,
        call_timeout_secs: u64,
        lookup_failure_policy: LookupFailurePolicy,
    ) -> Result<Self> {
        if hold_days <= 0 {
            return Err(ReleaseError::ConfigError(
                "hold period must be at least one day".to_string(),
            ));
        }
        let hold_period = HoldPeriod::try_days(hold_days).ok_or_else(|| {
            ReleaseError::ConfigError(format!("hold period of {hold_days} days is out of range"))
        })?;
        if max_concurrency == Some(0) {
            return Err(ReleaseError::ConfigError(
                "max concurrency must be greater than zero".to_string(),
            ));
        }
        if call_timeout_secs == 0 {
            return Err(ReleaseError::ConfigError(
                "call timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            policy: ReleasePolicy::new(hold_period),
            max_concurrency,
            call_timeout: Duration::from_secs(call_timeout_secs),
            lookup_failure_policy,
        })
    }
}

/// Where and how to reach the payout function.
#[derive(Debug, Clone)]
pub struct PayoutConfig {
    pub url: String,
    pub api_token: Option<String>,
}
