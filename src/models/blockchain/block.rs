//! EVM block and transaction data structures.
//!
//! These structures mirror the response of `eth_getBlockByNumber` with full
//! transaction objects, keeping only the fields the monitor inspects.

use serde::{Deserialize, Serialize};

use super::hex;

/// Number of wei in one unit of the native currency.
const WEI_PER_NATIVE: u128 = 1_000_000_000_000_000_000;

/// A block with its full transaction list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Block {
	/// Block height
	#[serde(with = "hex::qty_u64")]
	pub number: u64,

	/// Block hash
	#[serde(default)]
	pub hash: Option<String>,

	/// Transactions in the block, in execution order
	#[serde(default)]
	pub transactions: Vec<Transaction>,
}

impl Block {
	/// Returns the block height.
	pub fn number(&self) -> u64 {
		self.number
	}
}

/// A single transaction inside a block.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	/// Transaction hash
	pub hash: String,

	/// Sender address
	pub from: String,

	/// Recipient address; `None` for contract creation transactions
	#[serde(default)]
	pub to: Option<String>,

	/// Transferred value in wei
	#[serde(with = "hex::qty_u128", default)]
	pub value: u128,

	/// Height of the containing block
	#[serde(with = "hex::qty_u64", default)]
	pub block_number: u64,
}

impl Transaction {
	/// Whether this transaction creates a contract (no recipient).
	pub fn is_contract_creation(&self) -> bool {
		self.to.is_none()
	}

	/// Formats the transferred value in native currency units.
	///
	/// Trailing zeros in the fractional part are trimmed; whole amounts are
	/// rendered without a fractional part.
	pub fn value_formatted(&self) -> String {
		let whole = self.value / WEI_PER_NATIVE;
		let frac = self.value % WEI_PER_NATIVE;
		if frac == 0 {
			return whole.to_string();
		}
		let padded = format!("{:018}", frac);
		format!("{}.{}", whole, padded.trim_end_matches('0'))
	}
}
