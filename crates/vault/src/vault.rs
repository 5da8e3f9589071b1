//! Vault - the lending state machine
//!
//! Every mutating call is one atomic transition:
//!
//! 1. validate and plan (checked arithmetic, no mutation)
//! 2. settle funds with the bank as a single all-or-nothing batch
//! 3. apply the planned values (infallible)
//!
//! A failure in steps 1 or 2 leaves the vault exactly as it was.

use bitflow_core::{AccountId, Amount, Height};
use tracing::info;

use crate::bank::{Bank, Transfer};
use crate::deposits::DepositLedger;
use crate::error::VaultError;
use crate::health::{self, Liquidation, Price};
use crate::loan::{self, Loan, LoanBook, Repayment};
use crate::metrics::ProtocolMetrics;

/// Who is calling, and at which height the transition commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub sender: AccountId,
    pub height: Height,
}

impl Context {
    pub fn new(sender: AccountId, height: Height) -> Self {
        Self { sender, height }
    }
}

#[derive(Debug, Clone)]
pub struct Vault<B: Bank> {
    owner: AccountId,
    /// Bank account holding all deposited collateral
    custody: AccountId,
    bank: B,
    pub(crate) deposits: DepositLedger,
    pub(crate) loans: LoanBook,
    pub(crate) metrics: ProtocolMetrics,
    initialized_at: Option<Height>,
}

impl<B: Bank> Vault<B> {
    pub fn new(owner: AccountId, custody: AccountId, bank: B) -> Self {
        Self {
            owner,
            custody,
            bank,
            deposits: DepositLedger::new(),
            loans: LoanBook::new(),
            metrics: ProtocolMetrics::default(),
            initialized_at: None,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn custody(&self) -> &AccountId {
        &self.custody
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Height at which the owner initialized the vault
    pub fn initialized_at(&self) -> Option<Height> {
        self.initialized_at
    }

    /// Custody holds the pooled collateral and never takes a position itself
    fn ensure_not_custody(&self, ctx: &Context) -> Result<(), VaultError> {
        if ctx.sender == self.custody {
            return Err(VaultError::CustodyCaller);
        }
        Ok(())
    }

    /// Owner-only. Repeated calls succeed and keep the first height.
    pub fn initialize(&mut self, ctx: &Context) -> Result<Height, VaultError> {
        if ctx.sender != self.owner {
            return Err(VaultError::OwnerOnly);
        }

        let height = *self.initialized_at.get_or_insert(ctx.height);
        info!(owner = %self.owner, height, "Vault initialized");
        Ok(height)
    }

    /// Deposit collateral. Returns the caller's new deposit balance.
    pub fn deposit(&mut self, ctx: &Context, amount: Amount) -> Result<Amount, VaultError> {
        self.ensure_not_custody(ctx)?;
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        let change = self.deposits.plan_credit(&ctx.sender, amount)?;
        let metrics = self.metrics.record_deposit(amount)?;

        self.bank
            .transfer(Transfer::new(&ctx.sender, &self.custody, amount))?;

        let balance = change.balance;
        self.deposits.apply(change);
        self.deposits.touch(&ctx.sender, ctx.height);
        self.metrics = metrics;

        info!(
            account = %ctx.sender,
            amount = %amount,
            balance = %balance,
            height = ctx.height,
            "Deposit committed"
        );
        Ok(balance)
    }

    /// Withdraw collateral. Returns the caller's remaining deposit balance.
    pub fn withdraw(&mut self, ctx: &Context, amount: Amount) -> Result<Amount, VaultError> {
        self.ensure_not_custody(ctx)?;
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        let change = self.deposits.plan_debit(&ctx.sender, amount)?;
        let metrics = self.metrics.record_withdrawal()?;

        self.bank
            .transfer(Transfer::new(&self.custody, &ctx.sender, amount))?;

        let balance = change.balance;
        self.deposits.apply(change);
        self.deposits.touch(&ctx.sender, ctx.height);
        self.metrics = metrics;

        info!(
            account = %ctx.sender,
            amount = %amount,
            balance = %balance,
            height = ctx.height,
            "Withdrawal committed"
        );
        Ok(balance)
    }

    /// Open a loan against the caller's deposit.
    ///
    /// Checks run in a fixed order after the caller check: rate, term,
    /// existing loan, collateral, then a positive amount.
    pub fn borrow(
        &mut self,
        ctx: &Context,
        amount: Amount,
        rate_bps: u32,
        term_days: u32,
    ) -> Result<Loan, VaultError> {
        self.ensure_not_custody(ctx)?;
        loan::validate_rate(rate_bps)?;
        loan::validate_term(term_days)?;

        if self.loans.has_loan(&ctx.sender) {
            return Err(VaultError::AlreadyHasLoan(ctx.sender.clone()));
        }

        let required = health::required_collateral(amount)?;
        let deposited = self.deposits.balance_of(&ctx.sender);
        if deposited < required {
            return Err(VaultError::InsufficientCollateral {
                deposited,
                required,
            });
        }

        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }

        let new_loan = Loan::open(amount, rate_bps, term_days, ctx.height)?;
        let metrics = self.metrics.record_borrow(amount)?;

        self.bank
            .transfer(Transfer::new(&self.custody, &ctx.sender, amount))?;

        self.loans.insert(ctx.sender.clone(), new_loan);
        self.deposits.touch(&ctx.sender, ctx.height);
        self.metrics = metrics;

        info!(
            account = %ctx.sender,
            principal = %amount,
            rate_bps,
            term_end_height = new_loan.term_end_height,
            height = ctx.height,
            "Loan opened"
        );
        Ok(new_loan)
    }

    /// Close the caller's loan by paying principal plus accrued interest
    pub fn repay(&mut self, ctx: &Context) -> Result<Repayment, VaultError> {
        self.ensure_not_custody(ctx)?;
        let open = self
            .loans
            .get(&ctx.sender)
            .ok_or_else(|| VaultError::NoActiveLoan(ctx.sender.clone()))?;

        let repayment = open.repayment_at(ctx.height)?;
        let metrics = self.metrics.record_repayment(repayment.total)?;

        self.bank
            .transfer(Transfer::new(&ctx.sender, &self.custody, repayment.total))?;

        self.loans.remove(&ctx.sender);
        self.deposits.touch(&ctx.sender, ctx.height);
        self.metrics = metrics;

        info!(
            account = %ctx.sender,
            principal = %repayment.principal,
            interest = %repayment.interest,
            total = %repayment.total,
            height = ctx.height,
            "Loan repaid"
        );
        Ok(repayment)
    }

    /// Force-close an unhealthy loan.
    ///
    /// The caller pays principal plus bonus and receives the borrower's whole
    /// deposit.
    pub fn liquidate(
        &mut self,
        ctx: &Context,
        borrower: &AccountId,
        price: Price,
    ) -> Result<Liquidation, VaultError> {
        self.ensure_not_custody(ctx)?;
        if &ctx.sender == borrower {
            return Err(VaultError::LiquidateOwnLoan);
        }

        let open = self
            .loans
            .get(borrower)
            .ok_or_else(|| VaultError::NoActiveLoan(borrower.clone()))?;

        let collateral = self.deposits.balance_of(borrower);
        let health_factor = health::health_factor(collateral, price, open.principal)?;
        if !health::is_below_threshold(health_factor) {
            return Err(VaultError::NotLiquidatable {
                account: borrower.clone(),
                health_factor,
            });
        }

        let terms = health::liquidation_terms(open.principal, collateral)?;
        let seizure = self.deposits.plan_seize(borrower)?;
        let metrics = self.metrics.record_liquidation(terms.paid)?;

        // A drained deposit leaves nothing to hand over
        let mut legs = vec![Transfer::new(&ctx.sender, &self.custody, terms.paid)];
        if !terms.seized_collateral.is_zero() {
            legs.push(Transfer::new(
                &self.custody,
                &ctx.sender,
                terms.seized_collateral,
            ));
        }
        self.bank.transfer_batch(&legs)?;

        self.loans.remove(borrower);
        self.deposits.apply(seizure);
        self.deposits.touch(&ctx.sender, ctx.height);
        self.deposits.touch(borrower, ctx.height);
        self.metrics = metrics;

        info!(
            liquidator = %ctx.sender,
            borrower = %borrower,
            price,
            health_factor,
            seized = %terms.seized_collateral,
            paid = %terms.paid,
            bonus = %terms.bonus,
            height = ctx.height,
            "Loan liquidated"
        );
        Ok(terms)
    }
}
