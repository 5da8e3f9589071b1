//! Loan records and simple interest
//!
//! Interest is non-compounding and linear in elapsed blocks:
//!
//! ```text
//! interest = floor(principal * rate_bps * blocks_elapsed / (100 * BLOCKS_PER_YEAR))
//! ```
//!
//! Floor division is part of the contract: small loans can accrue zero
//! interest for a while, and the block where it first turns non-zero is exact.
//! Accrual does not stop at the term end; an expired loan stays open until it
//! is repaid or liquidated.

use bitflow_core::{AccountId, Amount, Height};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{
    BLOCKS_PER_DAY, BLOCKS_PER_YEAR, MAX_INTEREST_RATE_BPS, MAX_TERM_DAYS, MIN_INTEREST_RATE_BPS,
    MIN_TERM_DAYS, PERCENT,
};
use crate::error::VaultError;

/// An open loan. At most one exists per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub principal: Amount,
    pub rate_bps: u32,
    pub start_height: Height,
    pub term_end_height: Height,
}

/// Amount owed to close a loan at a given height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repayment {
    pub principal: Amount,
    pub interest: Amount,
    pub total: Amount,
}

pub fn validate_rate(rate_bps: u32) -> Result<(), VaultError> {
    if (MIN_INTEREST_RATE_BPS..=MAX_INTEREST_RATE_BPS).contains(&rate_bps) {
        Ok(())
    } else {
        Err(VaultError::InvalidInterestRate(rate_bps))
    }
}

pub fn validate_term(term_days: u32) -> Result<(), VaultError> {
    if (MIN_TERM_DAYS..=MAX_TERM_DAYS).contains(&term_days) {
        Ok(())
    } else {
        Err(VaultError::InvalidTerm(term_days))
    }
}

/// Simple interest accrued by `principal` over `blocks`
pub fn simple_interest(principal: Amount, rate_bps: u32, blocks: u64) -> Result<Amount, VaultError> {
    let numerator = principal
        .value()
        .checked_mul(u128::from(rate_bps))
        .and_then(|v| v.checked_mul(u128::from(blocks)))
        .ok_or(VaultError::Overflow("interest"))?;

    Ok(Amount::new(
        numerator / (PERCENT * u128::from(BLOCKS_PER_YEAR)),
    ))
}

impl Loan {
    /// Open a loan starting at `start_height`.
    ///
    /// The term is converted to an absolute end height.
    pub fn open(
        principal: Amount,
        rate_bps: u32,
        term_days: u32,
        start_height: Height,
    ) -> Result<Self, VaultError> {
        validate_rate(rate_bps)?;
        validate_term(term_days)?;
        if principal.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        let term_end_height = u64::from(term_days)
            .checked_mul(BLOCKS_PER_DAY)
            .and_then(|span| start_height.checked_add(span))
            .ok_or(VaultError::Overflow("term end height"))?;

        Ok(Self {
            principal,
            rate_bps,
            start_height,
            term_end_height,
        })
    }

    /// Blocks since the loan started (0 before its start)
    pub fn blocks_elapsed(&self, height: Height) -> u64 {
        height.saturating_sub(self.start_height)
    }

    pub fn interest_at(&self, height: Height) -> Result<Amount, VaultError> {
        simple_interest(self.principal, self.rate_bps, self.blocks_elapsed(height))
    }

    pub fn repayment_at(&self, height: Height) -> Result<Repayment, VaultError> {
        let interest = self.interest_at(height)?;
        let total = self
            .principal
            .checked_add(interest)
            .ok_or(VaultError::Overflow("repayment total"))?;

        Ok(Repayment {
            principal: self.principal,
            interest,
            total,
        })
    }

    /// Informational only, expiry is never enforced
    pub fn is_expired(&self, height: Height) -> bool {
        height > self.term_end_height
    }
}

/// Open loans keyed by borrower
#[derive(Debug, Default, Clone)]
pub struct LoanBook {
    loans: HashMap<AccountId, Loan>,
}

impl LoanBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, account: &AccountId) -> Option<&Loan> {
        self.loans.get(account)
    }

    pub fn has_loan(&self, account: &AccountId) -> bool {
        self.loans.contains_key(account)
    }

    /// Record a new loan. Callers must have checked `has_loan` first.
    pub(crate) fn insert(&mut self, account: AccountId, loan: Loan) {
        let previous = self.loans.insert(account, loan);
        debug_assert!(previous.is_none(), "loan overwritten");
    }

    pub(crate) fn remove(&mut self, account: &AccountId) -> Option<Loan> {
        self.loans.remove(account)
    }

    /// Number of open loans
    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Loan)> {
        self.loans.iter()
    }

    /// Sum of principal across open loans
    pub fn outstanding_principal(&self) -> Option<Amount> {
        self.loans
            .values()
            .try_fold(Amount::ZERO, |acc, loan| acc.checked_add(loan.principal))
    }
}
