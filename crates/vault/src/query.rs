//! Read-only views
//!
//! Everything here is recomputed from the current maps on each call.

use bitflow_core::{AccountId, Amount, Height};
use serde::{Deserialize, Serialize};

use crate::bank::Bank;
use crate::error::VaultError;
use crate::health::{self, HealthStatus, Price};
use crate::loan::{Loan, Repayment};
use crate::metrics::{CallCounters, MarketOverview, ProtocolStats, VolumeTotals};
use crate::vault::Vault;

/// Full picture of one account at a given price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub deposit_amount: Amount,
    pub has_loan: bool,
    pub loan_amount: Amount,
    pub loan_interest_rate: u32,
    pub loan_term_end: Height,
    pub health_factor: Option<u128>,
    pub health_status: Option<HealthStatus>,
    pub is_liquidatable: bool,
    pub max_borrow_available: Amount,
    pub collateral_usage_percent: u128,
}

impl<B: Bank> Vault<B> {
    pub fn deposit_of(&self, account: &AccountId) -> Amount {
        self.deposits.balance_of(account)
    }

    pub fn loan_of(&self, account: &AccountId) -> Option<Loan> {
        self.loans.get(account).copied()
    }

    pub fn total_deposits(&self) -> Amount {
        self.deposits.total()
    }

    pub fn total_repaid(&self) -> Amount {
        self.metrics.total_repaid
    }

    pub fn total_liquidations(&self) -> u64 {
        self.metrics.total_liquidations
    }

    pub fn protocol_stats(&self) -> ProtocolStats {
        ProtocolStats {
            total_deposits: self.deposits.total(),
            total_repaid: self.metrics.total_repaid,
            total_liquidations: self.metrics.total_liquidations,
        }
    }

    pub fn protocol_metrics(&self) -> CallCounters {
        self.metrics.calls
    }

    pub fn volume_metrics(&self) -> VolumeTotals {
        self.metrics.volumes
    }

    pub fn market_overview(&self) -> Result<MarketOverview, VaultError> {
        Ok(MarketOverview {
            total_deposits: self.deposits.total(),
            borrow_volume: self.metrics.volumes.borrow_volume,
            active_loans: self.loans.len() as u64,
            outstanding_principal: self
                .loans
                .outstanding_principal()
                .ok_or(VaultError::Overflow("outstanding principal"))?,
        })
    }

    pub fn required_collateral(&self, amount: Amount) -> Result<Amount, VaultError> {
        health::required_collateral(amount)
    }

    /// `None` when the account has no loan
    pub fn health_factor(
        &self,
        account: &AccountId,
        price: Price,
    ) -> Result<Option<u128>, VaultError> {
        self.loans
            .get(account)
            .map(|loan| health::health_factor(self.deposits.balance_of(account), price, loan.principal))
            .transpose()
    }

    /// False when the account has no loan
    pub fn is_liquidatable(&self, account: &AccountId, price: Price) -> Result<bool, VaultError> {
        Ok(self
            .health_factor(account, price)?
            .is_some_and(health::is_below_threshold))
    }

    /// What closing the account's loan would cost at `height`
    pub fn repayment_amount(
        &self,
        account: &AccountId,
        height: Height,
    ) -> Result<Option<Repayment>, VaultError> {
        self.loans
            .get(account)
            .map(|loan| loan.repayment_at(height))
            .transpose()
    }

    pub fn max_borrow(&self, account: &AccountId) -> Result<Amount, VaultError> {
        health::max_borrow(self.deposits.balance_of(account))
    }

    pub fn position_summary(
        &self,
        account: &AccountId,
        price: Price,
    ) -> Result<PositionSummary, VaultError> {
        let deposit = self.deposits.balance_of(account);
        let loan = self.loans.get(account);
        let health_factor = self.health_factor(account, price)?;

        let collateral_usage_percent = match loan {
            Some(loan) if !deposit.is_zero() => {
                health::required_collateral(loan.principal)?
                    .value()
                    .checked_mul(100)
                    .ok_or(VaultError::Overflow("collateral usage"))?
                    / deposit.value()
            }
            _ => 0,
        };

        Ok(PositionSummary {
            deposit_amount: deposit,
            has_loan: loan.is_some(),
            loan_amount: loan.map_or(Amount::ZERO, |l| l.principal),
            loan_interest_rate: loan.map_or(0, |l| l.rate_bps),
            loan_term_end: loan.map_or(0, |l| l.term_end_height),
            health_factor,
            health_status: health_factor.map(HealthStatus::from_health_factor),
            is_liquidatable: health_factor.is_some_and(health::is_below_threshold),
            max_borrow_available: health::max_borrow(deposit)?,
            collateral_usage_percent,
        })
    }

    /// Blocks since the account's last mutating call (counted from 0 if none)
    pub fn time_since_last_activity(&self, account: &AccountId, height: Height) -> u64 {
        height.saturating_sub(self.deposits.last_activity(account).unwrap_or(0))
    }
}
