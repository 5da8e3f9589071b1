//! Operator configuration
//!
//! Loaded from an optional JSON file, then overridden from the environment.

use std::path::Path;

use bitflow_core::{AccountError, AccountId};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the vault owner
pub const OWNER_ENV: &str = "BITFLOW_OWNER";

/// Environment variable overriding the custody account
pub const CUSTODY_ENV: &str = "BITFLOW_CUSTODY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Only this account may initialize the vault
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Bank account holding all deposited collateral
    #[serde(default = "default_custody")]
    pub custody: String,

    /// Journal directory, relative to the data directory
    #[serde(default = "default_journal_dir")]
    pub journal_dir: String,
}

fn default_owner() -> String {
    "deployer".to_string()
}

fn default_custody() -> String {
    "bitflow-vault".to_string()
}

fn default_journal_dir() -> String {
    "journal".to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            custody: default_custody(),
            journal_dir: default_journal_dir(),
        }
    }
}

impl RpcConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// File (or defaults), then `BITFLOW_OWNER` / `BITFLOW_CUSTODY`
    pub fn load(path: Option<&Path>) -> Result<Self, std::io::Error> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from a key lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(owner) = lookup(OWNER_ENV) {
            self.owner = owner;
        }
        if let Some(custody) = lookup(CUSTODY_ENV) {
            self.custody = custody;
        }
        self
    }

    pub fn owner_id(&self) -> Result<AccountId, AccountError> {
        AccountId::new(self.owner.as_str())
    }

    pub fn custody_id(&self) -> Result<AccountId, AccountError> {
        AccountId::new(self.custody.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RpcConfig::default();

        assert_eq!(config.owner, "deployer");
        assert_eq!(config.custody, "bitflow-vault");
        assert_eq!(config.journal_dir, "journal");
        assert!(config.owner_id().is_ok());
        assert!(config.custody_id().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RpcConfig = serde_json::from_str(r#"{"owner": "admin"}"#).unwrap();

        assert_eq!(config.owner, "admin");
        assert_eq!(config.custody, "bitflow-vault");
    }

    #[test]
    fn test_overrides() {
        let config = RpcConfig::default().with_overrides(|key| match key {
            OWNER_ENV => Some("ops".to_string()),
            _ => None,
        });

        assert_eq!(config.owner, "ops");
        assert_eq!(config.custody, "bitflow-vault");
    }

    #[test]
    fn test_invalid_owner_rejected() {
        let config = RpcConfig {
            owner: "has space".to_string(),
            ..RpcConfig::default()
        };
        assert!(config.owner_id().is_err());
    }
}
