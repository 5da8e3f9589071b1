//! Account ledger - per-account collateral deposits
//!
//! Balances are kept in micro-units; a missing entry means zero. Changes are
//! planned first (checked arithmetic, no mutation) and applied afterwards, so
//! a transition can abort after planning without leaving partial state.

use bitflow_core::{AccountId, Amount, Height};
use std::collections::HashMap;

use crate::error::VaultError;

/// A precomputed deposit update, produced by one of the `plan_*` methods
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a planned change does nothing until applied"]
pub struct DepositChange {
    pub account: AccountId,
    pub balance: Amount,
    pub total: Amount,
}

#[derive(Debug, Default, Clone)]
pub struct DepositLedger {
    balances: HashMap<AccountId, Amount>,
    /// Sum of current balances, maintained incrementally
    total: Amount,
    last_activity: HashMap<AccountId, Height>,
}

impl DepositLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit balance of an account (0 if it never deposited)
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Global deposit total
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Height of the last mutating call the account took part in
    pub fn last_activity(&self, account: &AccountId) -> Option<Height> {
        self.last_activity.get(account).copied()
    }

    /// Number of accounts holding a non-zero deposit
    pub fn depositors(&self) -> usize {
        self.balances.len()
    }

    pub fn plan_credit(
        &self,
        account: &AccountId,
        amount: Amount,
    ) -> Result<DepositChange, VaultError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(VaultError::Overflow("deposit balance"))?;
        let total = self
            .total
            .checked_add(amount)
            .ok_or(VaultError::Overflow("total deposits"))?;

        Ok(DepositChange {
            account: account.clone(),
            balance,
            total,
        })
    }

    pub fn plan_debit(
        &self,
        account: &AccountId,
        amount: Amount,
    ) -> Result<DepositChange, VaultError> {
        let available = self.balance_of(account);
        let balance = available
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientBalance {
                available,
                requested: amount,
            })?;
        let total = self
            .total
            .checked_sub(amount)
            .ok_or(VaultError::Overflow("total deposits"))?;

        Ok(DepositChange {
            account: account.clone(),
            balance,
            total,
        })
    }

    /// Plan the seizure of an account's entire deposit
    pub fn plan_seize(&self, account: &AccountId) -> Result<DepositChange, VaultError> {
        self.plan_debit(account, self.balance_of(account))
    }

    pub fn apply(&mut self, change: DepositChange) {
        if change.balance.is_zero() {
            self.balances.remove(&change.account);
        } else {
            self.balances.insert(change.account, change.balance);
        }
        self.total = change.total;
    }

    /// Record that the account took part in a mutating call at `height`
    pub fn touch(&mut self, account: &AccountId, height: Height) {
        self.last_activity.insert(account.clone(), height);
    }
}
