//! Bitflow Vault - Collateralized lending ledger
//!
//! Users deposit the base asset as collateral, borrow against it at a fixed
//! rate and term, accrue simple interest per block, repay to close the loan,
//! or get liquidated by a third party once their health factor drops below
//! the threshold.
//!
//! All arithmetic is integer with floor division. Every mutating call is an
//! atomic transition: it commits in full or leaves no trace.

pub mod bank;
pub mod call;
pub mod chain;
pub mod constants;
pub mod deposits;
pub mod error;
pub mod health;
pub mod loan;
pub mod metrics;
pub mod query;
pub mod vault;

pub use bank::{Bank, InMemoryBank, Transfer};
pub use call::{Outcome, Receipt, VaultCall};
pub use chain::{Chain, ChainEvent, TxResult};
pub use error::{TransferError, VaultError};
pub use health::{HealthStatus, Liquidation, Price};
pub use loan::{Loan, Repayment};
pub use metrics::{CallCounters, MarketOverview, ProtocolStats, VolumeTotals};
pub use query::PositionSummary;
pub use vault::{Context, Vault};
