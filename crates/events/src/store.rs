//! JSONL journal store - append-only, hash-chained writer

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bitflow_core::Height;
use bitflow_vault::{ChainEvent, Outcome};
use tracing::debug;

use crate::entry::JournalEntry;
use crate::error::JournalError;
use crate::hash::GENESIS_HASH;
use crate::reader::EventReader;

/// Append-only JSONL journal, one file per UTC day
pub struct EventStore {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    last_sequence: u64,
    last_hash: String,
}

impl EventStore {
    /// Open (or create) the journal at the given path and resume its chain
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let (last_sequence, last_hash) = match EventReader::from_directory(&base_path)?.last_entry()? {
            Some(entry) => (entry.sequence, entry.hash),
            None => (0, GENESIS_HASH.to_string()),
        };

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            last_sequence,
            last_hash,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Sequence of the last appended entry (0 when empty)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Seal the event onto the chain and write it
    pub fn append(
        &mut self,
        height: Height,
        event: ChainEvent,
        outcome: Outcome,
    ) -> Result<JournalEntry, JournalError> {
        let entry = JournalEntry::seal(
            self.last_sequence + 1,
            self.last_hash.clone(),
            height,
            event,
            outcome,
        )?;

        let date = entry.timestamp.format("%Y-%m-%d").to_string();
        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        let json = serde_json::to_string(&entry)?;
        if let Some(ref mut writer) = self.current_file {
            let written = writeln!(writer, "{}", json).and_then(|()| writer.flush());
            if let Err(e) = written {
                self.discard_writer();
                return Err(e.into());
            }
        }

        self.last_sequence = entry.sequence;
        self.last_hash = entry.hash.clone();
        debug!(sequence = entry.sequence, height, "Journal entry appended");

        Ok(entry)
    }

    /// Rotate to a new file for the given date
    fn rotate_file(&mut self, date: &str) -> Result<(), JournalError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());

        Ok(())
    }

    /// Drop the writer without flushing what it still buffers; the next
    /// append reopens the day file.
    fn discard_writer(&mut self) {
        if let Some(writer) = self.current_file.take() {
            let (_file, _unwritten) = writer.into_parts();
        }
        self.current_date = None;
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), JournalError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
