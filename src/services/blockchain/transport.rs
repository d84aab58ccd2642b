//! EVM JSON-RPC transport implementation.
//!
//! Implements [`LedgerClient`] over plain HTTP JSON-RPC 2.0. The connection
//! is verified at construction with a lightweight `eth_blockNumber` request
//! so misconfigured endpoints fail at startup instead of on the first cycle.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{Block, TransactionReceipt},
	services::blockchain::{client::LedgerClient, error::ClientError},
};

/// JSON-RPC method constants
pub mod rpc_methods {
	/// Get the current chain head height
	pub const BLOCK_NUMBER: &str = "eth_blockNumber";
	/// Get a block with full transaction objects
	pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
	/// Get the receipt of a transaction
	pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
}

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A client for EVM JSON-RPC endpoints
#[derive(Clone, Debug)]
pub struct EvmRpcClient {
	client: reqwest::Client,
	url: String,
}

impl EvmRpcClient {
	/// Creates a new client and verifies the endpoint is reachable
	///
	/// # Arguments
	/// * `rpc_url` - HTTP(S) URL of the JSON-RPC endpoint
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - A connected client or a startup error
	pub async fn new(rpc_url: &str) -> Result<Self, anyhow::Error> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
			.build()
			.map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;

		let transport = Self {
			client,
			url: rpc_url.to_string(),
		};

		transport
			.send_request(rpc_methods::BLOCK_NUMBER, json!([]))
			.await?;

		Ok(transport)
	}

	/// Sends a JSON-RPC request and returns the `result` field
	async fn send_request(&self, method: &str, params: Value) -> Result<Value, ClientError> {
		let metadata = || {
			Some(HashMap::from([(
				"method".to_string(),
				method.to_string(),
			)]))
		};

		let response = self
			.client
			.post(&self.url)
			.json(&json!({
				"jsonrpc": "2.0",
				"id": 1,
				"method": method,
				"params": params,
			}))
			.send()
			.await
			.map_err(|e| {
				ClientError::rpc_error("RPC request failed", Some(e.into()), metadata())
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(ClientError::rpc_error(
				format!("RPC endpoint returned HTTP {}", status),
				None,
				metadata(),
			));
		}

		let body: Value = response.json().await.map_err(|e| {
			ClientError::response_parse_error(
				"RPC response is not valid JSON",
				Some(e.into()),
				metadata(),
			)
		})?;

		if let Some(error) = body.get("error") {
			return Err(ClientError::rpc_error(
				format!("RPC endpoint returned an error: {}", error),
				None,
				metadata(),
			));
		}

		body.get("result").cloned().ok_or_else(|| {
			ClientError::response_parse_error("RPC response has no result field", None, metadata())
		})
	}
}

#[async_trait]
impl LedgerClient for EvmRpcClient {
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
		let result = self
			.send_request(rpc_methods::BLOCK_NUMBER, json!([]))
			.await?;

		let raw = result.as_str().ok_or_else(|| {
			ClientError::response_parse_error("eth_blockNumber result is not a string", None, None)
		})?;

		let height = u64::from_str_radix(raw.trim_start_matches("0x"), 16).map_err(|e| {
			ClientError::response_parse_error(
				format!("eth_blockNumber result is not a hex quantity: {}", raw),
				Some(e.into()),
				None,
			)
		})?;

		Ok(height)
	}

	async fn get_block_with_transactions(&self, height: u64) -> Result<Block, anyhow::Error> {
		let result = self
			.send_request(
				rpc_methods::GET_BLOCK_BY_NUMBER,
				json!([format!("0x{:x}", height), true]),
			)
			.await?;

		if result.is_null() {
			return Err(ClientError::block_not_available(height, None, None).into());
		}

		let block: Block = serde_json::from_value(result).map_err(|e| {
			ClientError::response_parse_error(
				format!("failed to decode block {}", height),
				Some(e.into()),
				Some(HashMap::from([(
					"height".to_string(),
					height.to_string(),
				)])),
			)
		})?;

		Ok(block)
	}

	async fn get_transaction_receipt(
		&self,
		tx_hash: &str,
	) -> Result<TransactionReceipt, anyhow::Error> {
		let result = self
			.send_request(rpc_methods::GET_TRANSACTION_RECEIPT, json!([tx_hash]))
			.await?;

		if result.is_null() {
			return Err(ClientError::receipt_not_available(tx_hash, None, None).into());
		}

		let receipt: TransactionReceipt = serde_json::from_value(result).map_err(|e| {
			ClientError::response_parse_error(
				format!("failed to decode receipt for {}", tx_hash),
				Some(e.into()),
				Some(HashMap::from([(
					"tx_hash".to_string(),
					tx_hash.to_string(),
				)])),
			)
		})?;

		Ok(receipt)
	}
}
