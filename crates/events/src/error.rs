//! Journal errors

use bitflow_core::Height;
use bitflow_vault::Outcome;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Broken link at seq {sequence}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at seq {sequence}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },

    #[error("Replay diverged at seq {sequence}: journal has {expected:?}, chain produced {actual:?}")]
    ReplayDivergence {
        sequence: u64,
        expected: Box<Outcome>,
        actual: Box<Outcome>,
    },

    #[error("Replay diverged at seq {sequence}: journal height {expected}, chain height {actual}")]
    HeightMismatch {
        sequence: u64,
        expected: Height,
        actual: Height,
    },
}
