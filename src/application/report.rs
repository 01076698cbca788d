use super::dispatcher::DispatchOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FailedRelease {
    pub order_id: String,
    pub error: String,
}

/// The job's response body: `processed == successful + failed.len()`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct ReleaseReport {
    pub processed: usize,
    pub successful: usize,
    pub failed: Vec<FailedRelease>,
}

impl ReleaseReport {
    pub fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        let failed: Vec<FailedRelease> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                DispatchOutcome::Failed { order_id, error } => Some(FailedRelease {
                    order_id: order_id.clone(),
                    error: error.clone(),
                }),
                DispatchOutcome::Released { .. } => None,
            })
            .collect();

        Self {
            processed: outcomes.len(),
            successful: outcomes.len() - failed.len(),
            failed,
        }
    }
}
