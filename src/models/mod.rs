//! Domain models and data structures for the monitor.
//!
//! - `blockchain`: EVM block, transaction and receipt types
//! - `config`: configuration loading and startup validation

mod blockchain;
mod config;

pub use blockchain::{Block, Transaction, TransactionReceipt};
pub use config::{ConfigError, EmailSettings, MonitorConfig, TelegramSettings};
