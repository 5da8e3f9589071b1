//! Asset custody
//!
//! The vault never keeps base-asset balances itself; it moves funds through a
//! `Bank`. A batch of transfers is all-or-nothing so that multi-leg
//! transitions (liquidation) cannot partially settle.

use bitflow_core::{AccountId, Amount};
use std::collections::HashMap;

use crate::error::TransferError;

/// A single movement of the base asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

impl Transfer {
    pub fn new(from: &AccountId, to: &AccountId, amount: Amount) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            amount,
        }
    }
}

/// Base-asset transfer primitive
pub trait Bank {
    /// Spendable balance of an account (0 if unknown)
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Execute all transfers or none of them.
    ///
    /// Each leg must move a positive amount between two distinct accounts.
    fn transfer_batch(&mut self, transfers: &[Transfer]) -> Result<(), TransferError>;

    /// Execute a single transfer
    fn transfer(&mut self, transfer: Transfer) -> Result<(), TransferError> {
        self.transfer_batch(std::slice::from_ref(&transfer))
    }
}

/// In-memory bank used by the operator runtime and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryBank {
    balances: HashMap<AccountId, Amount>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new funds out of thin air (faucet / genesis allocation)
    pub fn mint(&mut self, account: &AccountId, amount: Amount) -> Result<Amount, TransferError> {
        if amount.is_zero() {
            return Err(TransferError::NonPositiveAmount);
        }

        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow(account.clone()))?;
        self.balances.insert(account.clone(), balance);

        Ok(balance)
    }

    /// Sum of all balances
    pub fn total_supply(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }
}

impl Bank for InMemoryBank {
    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer_batch(&mut self, transfers: &[Transfer]) -> Result<(), TransferError> {
        // Stage every touched balance, commit only once all legs succeed
        let mut staged: HashMap<&AccountId, Amount> = HashMap::new();

        for t in transfers {
            if t.amount.is_zero() {
                return Err(TransferError::NonPositiveAmount);
            }
            if t.from == t.to {
                return Err(TransferError::SelfTransfer(t.from.clone()));
            }

            let from_balance = staged
                .get(&t.from)
                .copied()
                .unwrap_or_else(|| self.balance_of(&t.from));
            let from_after =
                from_balance
                    .checked_sub(t.amount)
                    .ok_or_else(|| TransferError::InsufficientFunds {
                        account: t.from.clone(),
                        available: from_balance,
                        required: t.amount,
                    })?;

            let to_balance = staged
                .get(&t.to)
                .copied()
                .unwrap_or_else(|| self.balance_of(&t.to));
            let to_after = to_balance
                .checked_add(t.amount)
                .ok_or_else(|| TransferError::Overflow(t.to.clone()))?;

            staged.insert(&t.from, from_after);
            staged.insert(&t.to, to_after);
        }

        for (account, balance) in staged {
            self.balances.insert(account.clone(), balance);
        }

        Ok(())
    }
}
