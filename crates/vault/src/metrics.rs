//! Protocol metrics
//!
//! Call counters and volume totals only ever grow. Each `record_*` method
//! returns the updated metrics instead of mutating in place, so a transition
//! can fail on overflow before anything is committed.

use bitflow_core::Amount;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// Number of successful calls per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCounters {
    pub deposits: u64,
    pub withdrawals: u64,
    pub borrows: u64,
    pub repayments: u64,
    pub liquidations: u64,
}

/// Cumulative amounts moved per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeTotals {
    pub deposit_volume: Amount,
    pub borrow_volume: Amount,
    pub repay_volume: Amount,
    pub liquidation_volume: Amount,
}

/// Summary returned by `protocol_stats`.
///
/// Borrow volume and active loans are deliberately absent here; they are
/// reported by `MarketOverview`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub total_deposits: Amount,
    pub total_repaid: Amount,
    pub total_liquidations: u64,
}

/// Extended market view, derived from the loan book on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub total_deposits: Amount,
    pub borrow_volume: Amount,
    pub active_loans: u64,
    pub outstanding_principal: Amount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMetrics {
    pub calls: CallCounters,
    pub volumes: VolumeTotals,
    /// Sum of every `total` ever repaid (principal + interest)
    pub total_repaid: Amount,
    pub total_liquidations: u64,
}

fn bump(counter: u64, what: &'static str) -> Result<u64, VaultError> {
    counter.checked_add(1).ok_or(VaultError::Overflow(what))
}

fn grow(total: Amount, amount: Amount, what: &'static str) -> Result<Amount, VaultError> {
    total.checked_add(amount).ok_or(VaultError::Overflow(what))
}

impl ProtocolMetrics {
    pub fn record_deposit(&self, amount: Amount) -> Result<Self, VaultError> {
        let mut next = *self;
        next.calls.deposits = bump(self.calls.deposits, "deposit counter")?;
        next.volumes.deposit_volume = grow(self.volumes.deposit_volume, amount, "deposit volume")?;
        Ok(next)
    }

    /// Withdrawals are counted but carry no volume total
    pub fn record_withdrawal(&self) -> Result<Self, VaultError> {
        let mut next = *self;
        next.calls.withdrawals = bump(self.calls.withdrawals, "withdrawal counter")?;
        Ok(next)
    }

    pub fn record_borrow(&self, amount: Amount) -> Result<Self, VaultError> {
        let mut next = *self;
        next.calls.borrows = bump(self.calls.borrows, "borrow counter")?;
        next.volumes.borrow_volume = grow(self.volumes.borrow_volume, amount, "borrow volume")?;
        Ok(next)
    }

    pub fn record_repayment(&self, total: Amount) -> Result<Self, VaultError> {
        let mut next = *self;
        next.calls.repayments = bump(self.calls.repayments, "repayment counter")?;
        next.volumes.repay_volume = grow(self.volumes.repay_volume, total, "repay volume")?;
        next.total_repaid = grow(self.total_repaid, total, "total repaid")?;
        Ok(next)
    }

    pub fn record_liquidation(&self, paid: Amount) -> Result<Self, VaultError> {
        let mut next = *self;
        next.calls.liquidations = bump(self.calls.liquidations, "liquidation counter")?;
        next.volumes.liquidation_volume =
            grow(self.volumes.liquidation_volume, paid, "liquidation volume")?;
        next.total_liquidations = bump(self.total_liquidations, "total liquidations")?;
        Ok(next)
    }
}
