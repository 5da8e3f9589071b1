//! Bitflow Events - hash-chained JSONL journal
//!
//! Every chain event (faucet mint, mined blocks, submitted transaction) is
//! appended together with its outcome. The journal is the source of truth:
//! replaying it from an empty chain rebuilds the exact same state, and the
//! hash chain exposes any edited, dropped or reordered line.

pub mod entry;
pub mod error;
pub mod hash;
pub mod reader;
pub mod replay;
pub mod store;

pub use entry::JournalEntry;
pub use error::JournalError;
pub use hash::{calculate_entry_hash, verify_chain, GENESIS_HASH};
pub use reader::EventReader;
pub use replay::replay;
pub use store::EventStore;
