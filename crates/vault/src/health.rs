//! Collateral health and liquidation economics
//!
//! The price of the collateral is an input supplied by the caller on every
//! call; there is no oracle behind it. Health is an integer percentage:
//!
//! ```text
//! health = floor(floor(collateral * price / 100) * 100 / principal)
//! ```
//!
//! A position is liquidatable strictly below `LIQUIDATION_THRESHOLD`.

use bitflow_core::Amount;
use serde::{Deserialize, Serialize};

use crate::constants::{
    LIQUIDATION_BONUS_PCT, LIQUIDATION_THRESHOLD, MIN_COLLATERAL_RATIO, PERCENT,
};
use crate::error::VaultError;

/// Collateral price as a percentage of par (100 = collateral worth its face value)
pub type Price = u128;

/// Coarse classification of a health factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    /// At or above the borrow-time collateral ratio
    Healthy,
    /// Between the liquidation threshold and the collateral ratio
    AtRisk,
    /// Below the liquidation threshold
    Liquidatable,
}

impl HealthStatus {
    pub fn from_health_factor(health_factor: u128) -> Self {
        if health_factor >= MIN_COLLATERAL_RATIO {
            HealthStatus::Healthy
        } else if health_factor >= LIQUIDATION_THRESHOLD {
            HealthStatus::AtRisk
        } else {
            HealthStatus::Liquidatable
        }
    }
}

/// Settlement of a liquidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquidation {
    /// Entire deposit of the borrower, handed to the liquidator
    pub seized_collateral: Amount,
    /// Principal plus bonus, paid by the liquidator
    pub paid: Amount,
    pub bonus: Amount,
}

/// Health of a loan. A zero principal has no defined health and is refused.
pub fn health_factor(collateral: Amount, price: Price, principal: Amount) -> Result<u128, VaultError> {
    if principal.is_zero() {
        return Err(VaultError::DivisionByZero("health factor"));
    }

    let value = collateral
        .value()
        .checked_mul(price)
        .ok_or(VaultError::Overflow("collateral value"))?
        / PERCENT;

    value
        .checked_mul(PERCENT)
        .map(|v| v / principal.value())
        .ok_or(VaultError::Overflow("health factor"))
}

pub fn is_below_threshold(health_factor: u128) -> bool {
    health_factor < LIQUIDATION_THRESHOLD
}

/// Collateral needed to borrow `amount`: `floor(amount * 150 / 100)`
pub fn required_collateral(amount: Amount) -> Result<Amount, VaultError> {
    amount
        .value()
        .checked_mul(MIN_COLLATERAL_RATIO)
        .map(|v| Amount::new(v / PERCENT))
        .ok_or(VaultError::Overflow("required collateral"))
}

/// Largest loan a deposit supports: `floor(deposit * 100 / 150)`
pub fn max_borrow(deposit: Amount) -> Result<Amount, VaultError> {
    deposit
        .value()
        .checked_mul(PERCENT)
        .map(|v| Amount::new(v / MIN_COLLATERAL_RATIO))
        .ok_or(VaultError::Overflow("max borrow"))
}

pub fn liquidation_bonus(principal: Amount) -> Result<Amount, VaultError> {
    principal
        .value()
        .checked_mul(LIQUIDATION_BONUS_PCT)
        .map(|v| Amount::new(v / PERCENT))
        .ok_or(VaultError::Overflow("liquidation bonus"))
}

/// Settlement terms for liquidating a loan backed by `collateral`
pub fn liquidation_terms(principal: Amount, collateral: Amount) -> Result<Liquidation, VaultError> {
    let bonus = liquidation_bonus(principal)?;
    let paid = principal
        .checked_add(bonus)
        .ok_or(VaultError::Overflow("liquidation payment"))?;

    Ok(Liquidation {
        seized_collateral: collateral,
        paid,
        bonus,
    })
}
