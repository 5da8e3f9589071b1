//! AccountId - Validated account identifier
//!
//! Accounts are opaque names (wallet principals, service accounts). We only
//! guarantee they are non-empty, bounded and made of printable ASCII that is
//! safe to embed in journal lines and log fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of an account identifier
pub const MAX_ACCOUNT_LEN: usize = 128;

/// Errors that can occur when parsing account identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Empty account identifier")]
    Empty,

    #[error("Account identifier too long (max {MAX_ACCOUNT_LEN} chars): {0}")]
    TooLong(String),

    #[error("Invalid character {ch:?} in account identifier: {id}")]
    InvalidChar { id: String, ch: char },
}

/// Identifier of an account participating in the vault
///
/// # Examples
/// ```
/// use bitflow_core::AccountId;
///
/// let alice: AccountId = "wallet_1".parse().unwrap();
/// assert_eq!(alice.as_str(), "wallet_1");
///
/// assert!("".parse::<AccountId>().is_err());
/// assert!("bad name".parse::<AccountId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create a validated account identifier
    pub fn new(id: impl Into<String>) -> Result<Self, AccountError> {
        let id = id.into();

        if id.is_empty() {
            return Err(AccountError::Empty);
        }
        if id.len() > MAX_ACCOUNT_LEN {
            return Err(AccountError::TooLong(id));
        }
        if let Some(ch) = id.chars().find(|c| !is_valid_char(*c)) {
            return Err(AccountError::InvalidChar { id, ch });
        }

        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
