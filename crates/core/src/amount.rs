//! Amount - Micro-unit quantity of the base asset
//!
//! All balances, principals and volumes in Bitflow are integer micro-units
//! (1 display unit = 1_000_000 micro-units). Arithmetic is checked: overflow
//! is reported, never wrapped.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of micro-units in one display unit of the base asset
pub const MICRO_PER_UNIT: u128 = 1_000_000;

/// Scale of display-unit decimals (log10 of `MICRO_PER_UNIT`)
const UNIT_SCALE: u32 = 6;

/// Errors that can occur when converting amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Amount has more than 6 decimal places: {0}")]
    TooPrecise(Decimal),

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

/// A non-negative quantity of the base asset, in micro-units.
///
/// # Example
/// ```
/// use bitflow_core::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::from_units(Decimal::new(15, 1)).unwrap(); // 1.5 units
/// assert_eq!(amount.value(), 1_500_000);
/// assert_eq!(amount.to_units(), Decimal::new(1_500_000, 6));
///
/// // Negative amounts are rejected
/// assert!(Amount::from_units(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Largest representable amount
    pub const MAX: Self = Self(u128::MAX);

    /// Create an amount from raw micro-units
    #[inline]
    pub const fn new(micro: u128) -> Self {
        Self(micro)
    }

    /// Convert a display-unit decimal (e.g. `1.5`) into micro-units.
    ///
    /// Rejects negative values and values finer than one micro-unit.
    pub fn from_units(units: Decimal) -> Result<Self, AmountError> {
        if units.is_sign_negative() && !units.is_zero() {
            return Err(AmountError::NegativeAmount(units));
        }

        let micro = units
            .checked_mul(Decimal::from(MICRO_PER_UNIT as u64))
            .ok_or_else(|| AmountError::OutOfRange(units.to_string()))?;

        if !micro.fract().is_zero() {
            return Err(AmountError::TooPrecise(units));
        }

        micro
            .to_u128()
            .map(Self)
            .ok_or_else(|| AmountError::OutOfRange(units.to_string()))
    }

    /// Express this amount in display units.
    ///
    /// Saturates at `Decimal::MAX` for amounts beyond the decimal range.
    pub fn to_units(&self) -> Decimal {
        i128::try_from(self.0)
            .ok()
            .and_then(|m| Decimal::try_from_i128_with_scale(m, UNIT_SCALE).ok())
            .unwrap_or(Decimal::MAX)
    }

    /// Get the raw micro-unit value
    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition - returns None on overflow
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction - returns None if the result would be negative
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(micro: u128) -> Self {
        Self(micro)
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
