//! Bitflow Core - Domain types
//!
//! This crate contains the fundamental types shared by the vault, the journal
//! and the operator CLI:
//! - `Amount`: Non-negative micro-unit quantity of the base asset
//! - `AccountId`: Validated account identifier
//! - `Height`: Block height, the ledger's logical clock

pub mod account;
pub mod amount;

pub use account::{AccountError, AccountId};
pub use amount::{Amount, AmountError, MICRO_PER_UNIT};

/// Block height supplied by the execution environment
pub type Height = u64;
