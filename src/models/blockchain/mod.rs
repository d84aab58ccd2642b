//! EVM blockchain model implementations.
//!
//! Type definitions for blocks, transactions and receipts as returned by the
//! JSON-RPC endpoints the monitor consumes (`eth_getBlockByNumber`,
//! `eth_getTransactionReceipt`). Quantities arrive as `0x`-prefixed hex
//! strings and are decoded by the serde helpers in [`hex`].

mod block;
mod receipt;

pub use block::{Block, Transaction};
pub use receipt::TransactionReceipt;

/// Serde helpers for `0x`-prefixed hex quantities.
pub(crate) mod hex {
	use serde::{Deserialize, Deserializer, Serializer};

	fn strip_prefix(value: &str) -> &str {
		value
			.strip_prefix("0x")
			.or_else(|| value.strip_prefix("0X"))
			.unwrap_or(value)
	}

	/// Hex-encoded `u64` quantities (block numbers, gas, status).
	pub mod qty_u64 {
		use super::*;

		pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
			serializer.serialize_str(&format!("0x{:x}", value))
		}

		pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
			let raw = String::deserialize(deserializer)?;
			u64::from_str_radix(strip_prefix(&raw), 16).map_err(serde::de::Error::custom)
		}
	}

	/// Hex-encoded `u128` quantities (transaction values in wei).
	///
	/// Values wider than 128 bits saturate to `u128::MAX` instead of failing
	/// the whole block deserialization.
	pub mod qty_u128 {
		use super::*;

		pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
			serializer.serialize_str(&format!("0x{:x}", value))
		}

		pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
			let raw = String::deserialize(deserializer)?;
			let digits = strip_prefix(&raw);
			match u128::from_str_radix(digits, 16) {
				Ok(value) => Ok(value),
				Err(_) if digits.len() > 32 && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
					Ok(u128::MAX)
				}
				Err(e) => Err(serde::de::Error::custom(e)),
			}
		}
	}
}
