//! Vault errors
//!
//! Every error aborts the whole transition. Semantic errors carry the stable
//! numeric codes clients match on; custody failures surface as the less
//! specific transfer codes.

use bitflow_core::{AccountId, Amount};
use thiserror::Error;

/// Failure of the underlying asset-transfer primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds for {account}: available {available}, required {required}")]
    InsufficientFunds {
        account: AccountId,
        available: Amount,
        required: Amount,
    },

    #[error("Sender and recipient are the same account: {0}")]
    SelfTransfer(AccountId),

    #[error("Transfer amount must be positive")]
    NonPositiveAmount,

    #[error("Balance overflow for {0}")]
    Overflow(AccountId),
}

impl TransferError {
    /// Low-level transfer code
    pub fn code(&self) -> Option<u32> {
        match self {
            TransferError::InsufficientFunds { .. } => Some(1),
            TransferError::SelfTransfer(_) => Some(2),
            TransferError::NonPositiveAmount => Some(3),
            TransferError::Overflow(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Account {0} already has an active loan")]
    AlreadyHasLoan(AccountId),

    #[error("Insufficient collateral: deposited {deposited}, required {required}")]
    InsufficientCollateral { deposited: Amount, required: Amount },

    #[error("No active loan for {0}")]
    NoActiveLoan(AccountId),

    #[error("Position of {account} is not liquidatable (health factor {health_factor})")]
    NotLiquidatable {
        account: AccountId,
        health_factor: u128,
    },

    #[error("Cannot liquidate own loan")]
    LiquidateOwnLoan,

    #[error("Only the vault owner can call this")]
    OwnerOnly,

    #[error("Interest rate {0} bps outside [1, 10000]")]
    InvalidInterestRate(u32),

    #[error("Loan term {0} days outside [1, 365]")]
    InvalidTerm(u32),

    #[error("The custody account cannot call the vault")]
    CustodyCaller,

    #[error("Division by zero computing {0}")]
    DivisionByZero(&'static str),

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

impl VaultError {
    /// Stable error code reported to clients
    pub fn code(&self) -> Option<u32> {
        match self {
            VaultError::InsufficientBalance { .. } => Some(101),
            VaultError::InvalidAmount => Some(102),
            VaultError::AlreadyHasLoan(_) => Some(103),
            VaultError::InsufficientCollateral { .. } => Some(105),
            VaultError::NoActiveLoan(_) => Some(106),
            VaultError::NotLiquidatable { .. } => Some(107),
            VaultError::LiquidateOwnLoan => Some(108),
            VaultError::OwnerOnly => Some(109),
            VaultError::InvalidInterestRate(_) => Some(110),
            VaultError::InvalidTerm(_) => Some(111),
            VaultError::CustodyCaller => Some(112),
            VaultError::Transfer(e) => e.code(),
            VaultError::Overflow(_) | VaultError::DivisionByZero(_) => None,
        }
    }
}
