//! Deterministic replay of a journal onto a chain

use bitflow_vault::{Chain, InMemoryBank, Outcome};
use tracing::{info, warn};

use crate::entry::JournalEntry;
use crate::error::JournalError;

/// Re-apply every entry in order.
///
/// Each event must reproduce its recorded outcome and chain height; the first
/// mismatch aborts the replay. Returns the number of entries applied.
pub fn replay(
    entries: &[JournalEntry],
    chain: &mut Chain<InMemoryBank>,
) -> Result<usize, JournalError> {
    for entry in entries {
        let actual = Outcome::from(&chain.apply(&entry.event));

        if actual != entry.outcome {
            warn!(sequence = entry.sequence, "Replay outcome diverged");
            return Err(JournalError::ReplayDivergence {
                sequence: entry.sequence,
                expected: Box::new(entry.outcome.clone()),
                actual: Box::new(actual),
            });
        }

        if chain.height() != entry.height {
            warn!(sequence = entry.sequence, "Replay height diverged");
            return Err(JournalError::HeightMismatch {
                sequence: entry.sequence,
                expected: entry.height,
                actual: chain.height(),
            });
        }
    }

    info!(entries = entries.len(), height = chain.height(), "Journal replayed");
    Ok(entries.len())
}
