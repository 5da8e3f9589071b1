//! JSONL journal reader - sequential reader for replay and audit

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::entry::JournalEntry;
use crate::error::JournalError;

/// Sequential journal reader
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Create a new reader from a directory (empty if it does not exist)
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().is_some_and(|ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    /// Journal files in replay order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read all entries from all files in order
    pub fn read_all(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let mut entries = Vec::new();

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                entries.push(serde_json::from_str(&line)?);
            }
        }

        Ok(entries)
    }

    /// Last entry (for sequence and prev_hash)
    pub fn last_entry(&self) -> Result<Option<JournalEntry>, JournalError> {
        let Some(last_file) = self.files.last() else {
            return Ok(None);
        };

        let reader = BufReader::new(File::open(last_file)?);
        let mut last = None;
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last = Some(line);
            }
        }

        last.map(|line| serde_json::from_str(&line))
            .transpose()
            .map_err(JournalError::from)
    }

    /// Count total entries across all files
    pub fn count(&self) -> Result<usize, JournalError> {
        let mut count = 0;

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}
