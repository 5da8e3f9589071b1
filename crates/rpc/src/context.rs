//! Application context - wires the chain and the journal together

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bitflow_core::{AccountId, Amount};
use bitflow_events::{replay, verify_chain, EventReader, EventStore, JournalEntry, JournalError};
use bitflow_vault::{Chain, ChainEvent, InMemoryBank, Outcome, VaultCall};
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{info, warn};

use crate::config::RpcConfig;

/// Single writer over the chain, persisting every event it applies
pub struct AppContext {
    config: RpcConfig,
    chain: Arc<RwLock<Chain<InMemoryBank>>>,
    journal: Arc<Mutex<EventStore>>,
    journal_path: PathBuf,
}

impl AppContext {
    /// Open the data directory and rebuild state from the journal
    pub async fn new(data_path: impl AsRef<Path>, config: RpcConfig) -> Result<Self, anyhow::Error> {
        let journal_path = data_path.as_ref().join(&config.journal_dir);
        std::fs::create_dir_all(&journal_path)?;

        let entries = EventReader::from_directory(&journal_path)?.read_all()?;
        verify_chain(&entries)?;

        let mut chain = Chain::in_memory(config.owner_id()?, config.custody_id()?);
        replay(&entries, &mut chain)?;

        let journal = EventStore::open(&journal_path)?;
        info!(
            path = %journal_path.display(),
            entries = entries.len(),
            height = chain.height(),
            "Context ready"
        );

        Ok(Self {
            config,
            chain: Arc::new(RwLock::new(chain)),
            journal: Arc::new(Mutex::new(journal)),
            journal_path,
        })
    }

    /// Apply an event and append it to the journal.
    ///
    /// The event runs on a copy of the chain that replaces the live one only
    /// once the entry is on disk, so a failed append leaves no trace. The
    /// chain write lock is held throughout.
    pub async fn record(&self, event: ChainEvent) -> Result<JournalEntry, JournalError> {
        let mut chain = self.chain.write().await;
        let mut next = chain.clone();
        let outcome = Outcome::from(&next.apply(&event));

        let mut journal = self.journal.lock().await;
        let entry = match journal.append(next.height(), event, outcome) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Journal append failed, event discarded");
                return Err(e);
            }
        };

        *chain = next;
        Ok(entry)
    }

    pub async fn submit(&self, sender: AccountId, call: VaultCall) -> Result<JournalEntry, JournalError> {
        self.record(ChainEvent::Tx { sender, call }).await
    }

    pub async fn faucet(&self, account: AccountId, amount: Amount) -> Result<JournalEntry, JournalError> {
        self.record(ChainEvent::Faucet { account, amount }).await
    }

    pub async fn mine(&self, blocks: u64) -> Result<JournalEntry, JournalError> {
        self.record(ChainEvent::Mine { blocks }).await
    }

    /// Read access for queries
    pub async fn chain(&self) -> RwLockReadGuard<'_, Chain<InMemoryBank>> {
        self.chain.read().await
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Get last sequence number
    pub async fn last_sequence(&self) -> u64 {
        self.journal.lock().await.last_sequence()
    }
}
