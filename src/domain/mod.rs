//! Domain types and rules for escrow release.
//!
//! Nothing in here performs IO; stores and the payout function are reached
//! through the traits in [`ports`].

pub mod notification;
pub mod policy;
pub mod ports;
pub mod query;
pub mod transaction;
