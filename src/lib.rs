pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::job::ReleaseJob;
pub use application::report::ReleaseReport;
pub use error::{ReleaseError, Result};
