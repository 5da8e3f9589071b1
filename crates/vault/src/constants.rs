//! Protocol parameters
//!
//! These are fixed by the protocol, not configurable per loan.

/// Percentage denominator
pub const PERCENT: u128 = 100;

/// Minimum collateral ratio at borrow time (150%)
pub const MIN_COLLATERAL_RATIO: u128 = 150;

/// Health factor below which a position may be liquidated (110%)
pub const LIQUIDATION_THRESHOLD: u128 = 110;

/// Share of principal paid to the vault on top of principal by a liquidator (5%)
pub const LIQUIDATION_BONUS_PCT: u128 = 5;

/// Interest rate bounds in basis points (0.01% .. 100%)
pub const MIN_INTEREST_RATE_BPS: u32 = 1;
pub const MAX_INTEREST_RATE_BPS: u32 = 10_000;

/// Loan term bounds in days
pub const MIN_TERM_DAYS: u32 = 1;
pub const MAX_TERM_DAYS: u32 = 365;

/// ~10 minute blocks
pub const BLOCKS_PER_DAY: u64 = 144;
pub const BLOCKS_PER_YEAR: u64 = BLOCKS_PER_DAY * 365; // 52_560
