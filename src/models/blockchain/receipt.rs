//! EVM transaction receipt data structures.

use serde::{Deserialize, Serialize};

use super::hex;

/// Outcome record of an executed transaction.
///
/// Mirrors the fields of `eth_getTransactionReceipt` the monitor reports on.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
	/// Hash of the transaction this receipt belongs to
	pub transaction_hash: String,

	/// Execution status: `1` for success, `0` for failure
	#[serde(with = "hex::qty_u64", default)]
	pub status: u64,

	/// Gas consumed by the transaction
	#[serde(with = "hex::qty_u64", default)]
	pub gas_used: u64,
}

impl TransactionReceipt {
	/// Whether the transaction executed successfully.
	pub fn is_success(&self) -> bool {
		self.status == 1
	}

	/// Human-readable execution status.
	pub fn status_label(&self) -> &'static str {
		if self.is_success() {
			"Success"
		} else {
			"Failed"
		}
	}
}
