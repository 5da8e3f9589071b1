//! Bitflow RPC - operator CLI orchestrator
//!
//! This crate provides the `bitflow` binary and the command layer that drives
//! the vault chain and persists every event to the journal.

pub mod commands;
pub mod config;
pub mod context;

pub use config::RpcConfig;
pub use context::AppContext;
