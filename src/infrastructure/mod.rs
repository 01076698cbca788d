//! Adapters for the ports in [`crate::domain::ports`].

pub mod http_payout;
pub mod in_memory;
pub mod json_file;
