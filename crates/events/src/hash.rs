//! Hash chain utilities for journal integrity

use sha2::{Digest, Sha256};

use crate::entry::JournalEntry;
use crate::error::JournalError;

/// `prev_hash` of the first entry
pub const GENESIS_HASH: &str = "GENESIS";

/// Calculate SHA256 hash of entry content (excluding the hash field itself)
pub fn calculate_entry_hash(entry: &JournalEntry) -> Result<String, JournalError> {
    let mut hasher = Sha256::new();

    hasher.update(entry.sequence.to_le_bytes());
    hasher.update(entry.prev_hash.as_bytes());
    hasher.update(entry.timestamp.to_rfc3339().as_bytes());
    hasher.update(entry.height.to_le_bytes());
    hasher.update(serde_json::to_vec(&entry.event)?);
    hasher.update(serde_json::to_vec(&entry.outcome)?);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify hash chain integrity
pub fn verify_chain(entries: &[JournalEntry]) -> Result<(), JournalError> {
    let mut prev_hash = GENESIS_HASH.to_string();
    let mut expected_sequence = 1;

    for entry in entries {
        if entry.sequence != expected_sequence {
            return Err(JournalError::InvalidSequence {
                expected: expected_sequence,
                actual: entry.sequence,
            });
        }

        if entry.prev_hash != prev_hash {
            return Err(JournalError::BrokenLink {
                sequence: entry.sequence,
                expected: prev_hash,
                actual: entry.prev_hash.clone(),
            });
        }

        let calculated = calculate_entry_hash(entry)?;
        if entry.hash != calculated {
            return Err(JournalError::InvalidHash {
                sequence: entry.sequence,
                expected: calculated,
                actual: entry.hash.clone(),
            });
        }

        prev_hash = entry.hash.clone();
        expected_sequence += 1;
    }

    Ok(())
}
