use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Store error: {0}")]
    StoreError(String),
    /// The payout endpoint answered with a non-success status. `message` is the
    /// body's `error` field when present.
    #[error("{message}")]
    PayoutRejected { status: u16, message: String },
    #[error("payout call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
