//! Chain runtime - the execution environment around the vault
//!
//! Supplies the block height and the sender of each call. Every submitted
//! transaction lands in its own new block, whether it commits or not, so a
//! call observed at height `h` is evaluated at `h + 1`. Read-only queries are
//! answered at the current tip.

use bitflow_core::{AccountId, Amount, Height};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bank::{Bank, InMemoryBank};
use crate::call::{Receipt, VaultCall};
use crate::error::VaultError;
use crate::loan::Repayment;
use crate::vault::{Context, Vault};

/// Anything that can happen on the chain, in journal form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainEvent {
    /// Fund an account at the bank (does not produce a block)
    Faucet { account: AccountId, amount: Amount },
    /// Mine empty blocks
    Mine { blocks: u64 },
    /// Submit a vault call
    Tx { sender: AccountId, call: VaultCall },
}

/// A transaction and the height it was evaluated at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    pub height: Height,
    pub result: Result<Receipt, VaultError>,
}

#[derive(Debug, Clone)]
pub struct Chain<B: Bank> {
    vault: Vault<B>,
    height: Height,
}

impl<B: Bank> Chain<B> {
    pub fn new(vault: Vault<B>) -> Self {
        Self { vault, height: 0 }
    }

    /// Current tip
    pub fn height(&self) -> Height {
        self.height
    }

    pub fn vault(&self) -> &Vault<B> {
        &self.vault
    }

    /// Execute a call in a new block
    pub fn submit(&mut self, sender: AccountId, call: VaultCall) -> TxResult {
        self.height = self.height.saturating_add(1);
        let ctx = Context::new(sender, self.height);
        let result = self.vault.execute(&ctx, &call);

        TxResult {
            height: self.height,
            result,
        }
    }

    /// Advance the tip without executing anything
    pub fn mine_empty_blocks(&mut self, blocks: u64) -> Height {
        self.height = self.height.saturating_add(blocks);
        self.height
    }

    /// Repayment owed at the current tip
    pub fn repayment_amount(&self, account: &AccountId) -> Result<Option<Repayment>, VaultError> {
        self.vault.repayment_amount(account, self.height)
    }

    pub fn time_since_last_activity(&self, account: &AccountId) -> u64 {
        self.vault.time_since_last_activity(account, self.height)
    }
}

impl Chain<InMemoryBank> {
    /// Chain with a fresh in-memory bank
    pub fn in_memory(owner: AccountId, custody: AccountId) -> Self {
        Self::new(Vault::new(owner, custody, InMemoryBank::new()))
    }

    pub fn faucet(&mut self, account: &AccountId, amount: Amount) -> Result<Amount, VaultError> {
        let balance = self.vault.bank_mut().mint(account, amount)?;
        info!(account = %account, amount = %amount, balance = %balance, "Faucet mint");
        Ok(balance)
    }

    /// Apply a journaled event
    pub fn apply(&mut self, event: &ChainEvent) -> Result<Receipt, VaultError> {
        match event {
            ChainEvent::Faucet { account, amount } => self
                .faucet(account, *amount)
                .map(|balance| Receipt::Minted { balance }),
            ChainEvent::Mine { blocks } => Ok(Receipt::Mined {
                height: self.mine_empty_blocks(*blocks),
            }),
            ChainEvent::Tx { sender, call } => self.submit(sender.clone(), call.clone()).result,
        }
    }
}
