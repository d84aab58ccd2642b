//! Core ledger client interface.
//!
//! Defines the interface the scan engine uses to talk to the chain. Concrete
//! clients (and test mocks) implement this trait; the engine never depends on
//! a specific transport.

use async_trait::async_trait;

use crate::models::{Block, TransactionReceipt};

/// Defines the core interface for ledger clients
///
/// Per-call failures are recoverable for the caller: a failed block fetch is
/// treated as a missing block and a failed receipt fetch as an unresolved
/// match, neither aborts the surrounding scan cycle.
#[async_trait]
pub trait LedgerClient: Send + Sync + Clone {
	/// Retrieves the current chain head height
	///
	/// # Returns
	/// * `Result<u64, anyhow::Error>` - The latest block number or an error
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;

	/// Retrieves a block with its full transaction list
	///
	/// # Arguments
	/// * `height` - The block height to fetch
	///
	/// # Returns
	/// * `Result<Block, anyhow::Error>` - The block or an error (caller treats
	///   a failure as a missing block)
	async fn get_block_with_transactions(&self, height: u64) -> Result<Block, anyhow::Error>;

	/// Retrieves the receipt for a transaction
	///
	/// # Arguments
	/// * `tx_hash` - Hash of the transaction
	///
	/// # Returns
	/// * `Result<TransactionReceipt, anyhow::Error>` - The receipt or an error
	///   (caller treats a failure as an unresolved outcome)
	async fn get_transaction_receipt(
		&self,
		tx_hash: &str,
	) -> Result<TransactionReceipt, anyhow::Error>;
}
