//! Serializable calls and receipts
//!
//! `VaultCall` is the wire form of a mutating entry point. It is what the
//! chain runtime executes and what the journal records, so replaying the same
//! calls at the same heights reproduces the same state.

use bitflow_core::{AccountId, Amount, Height};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bank::Bank;
use crate::error::VaultError;
use crate::health::{Liquidation, Price};
use crate::loan::{Loan, Repayment};
use crate::vault::{Context, Vault};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum VaultCall {
    Initialize,
    Deposit {
        amount: Amount,
    },
    Withdraw {
        amount: Amount,
    },
    Borrow {
        amount: Amount,
        rate_bps: u32,
        term_days: u32,
    },
    Repay,
    Liquidate {
        borrower: AccountId,
        price: Price,
    },
}

impl VaultCall {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Result of a committed chain event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receipt {
    Initialized { height: Height },
    Deposited { balance: Amount },
    Withdrawn { balance: Amount },
    Borrowed { loan: Loan },
    Repaid { repayment: Repayment },
    Liquidated { liquidation: Liquidation },
    Minted { balance: Amount },
    Mined { height: Height },
}

/// Recorded outcome of a chain event, committed or rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Committed { receipt: Receipt },
    Rejected { code: Option<u32>, error: String },
}

impl From<&Result<Receipt, VaultError>> for Outcome {
    fn from(result: &Result<Receipt, VaultError>) -> Self {
        match result {
            Ok(receipt) => Outcome::Committed {
                receipt: receipt.clone(),
            },
            Err(e) => Outcome::Rejected {
                code: e.code(),
                error: e.to_string(),
            },
        }
    }
}

impl<B: Bank> Vault<B> {
    /// Dispatch a call to its entry point
    pub fn execute(&mut self, ctx: &Context, call: &VaultCall) -> Result<Receipt, VaultError> {
        let result = match call {
            VaultCall::Initialize => self
                .initialize(ctx)
                .map(|height| Receipt::Initialized { height }),
            VaultCall::Deposit { amount } => self
                .deposit(ctx, *amount)
                .map(|balance| Receipt::Deposited { balance }),
            VaultCall::Withdraw { amount } => self
                .withdraw(ctx, *amount)
                .map(|balance| Receipt::Withdrawn { balance }),
            VaultCall::Borrow {
                amount,
                rate_bps,
                term_days,
            } => self
                .borrow(ctx, *amount, *rate_bps, *term_days)
                .map(|loan| Receipt::Borrowed { loan }),
            VaultCall::Repay => self
                .repay(ctx)
                .map(|repayment| Receipt::Repaid { repayment }),
            VaultCall::Liquidate { borrower, price } => self
                .liquidate(ctx, borrower, *price)
                .map(|liquidation| Receipt::Liquidated { liquidation }),
        };

        if let Err(ref e) = result {
            debug!(
                call = call.name(),
                sender = %ctx.sender,
                height = ctx.height,
                code = ?e.code(),
                error = %e,
                "Call rejected"
            );
        }

        result
    }
}
