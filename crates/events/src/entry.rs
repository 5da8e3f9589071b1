//! Journal entry - one recorded chain event

use bitflow_core::Height;
use bitflow_vault::{ChainEvent, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JournalError;
use crate::hash::calculate_entry_hash;

/// One line of the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 1
    pub sequence: u64,
    /// Hash of the previous entry (`GENESIS` for the first)
    pub prev_hash: String,
    /// SHA256 over every other field
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    /// Chain tip after the event was applied
    pub height: Height,
    pub event: ChainEvent,
    pub outcome: Outcome,
}

impl JournalEntry {
    /// Build an entry and compute its hash
    pub fn seal(
        sequence: u64,
        prev_hash: impl Into<String>,
        height: Height,
        event: ChainEvent,
        outcome: Outcome,
    ) -> Result<Self, JournalError> {
        let mut entry = Self {
            sequence,
            prev_hash: prev_hash.into(),
            hash: String::new(),
            timestamp: Utc::now(),
            height,
            event,
            outcome,
        };
        entry.hash = calculate_entry_hash(&entry)?;
        Ok(entry)
    }
}
