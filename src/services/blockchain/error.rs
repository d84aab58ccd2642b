//! Ledger client error types.
//!
//! Provides error handling for JSON-RPC requests, response parsing, and
//! missing block/receipt conditions.

use std::collections::HashMap;

use thiserror::Error;

use crate::utils::{ErrorContext, TraceableError};

/// Ledger client error type
#[derive(Debug, Error)]
pub enum ClientError {
	/// Failure in making an RPC request
	#[error("RPC request failed: {0}")]
	RpcError(Box<ErrorContext>),

	/// Failure in parsing the RPC response
	#[error("Failed to parse RPC response: {0}")]
	ResponseParseError(Box<ErrorContext>),

	/// Block data not available for the requested height
	#[error("Block not available at height {height}")]
	BlockNotAvailable {
		height: u64,
		context: Box<ErrorContext>,
	},

	/// Receipt not available for the requested transaction
	#[error("Receipt not available for transaction {tx_hash}")]
	ReceiptNotAvailable {
		tx_hash: String,
		context: Box<ErrorContext>,
	},
}

impl ClientError {
	/// Creates an RPC error
	pub fn rpc_error(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RpcError(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}

	/// Creates a response parse error
	pub fn response_parse_error(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParseError(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}

	/// Creates a block not available error
	pub fn block_not_available(
		height: u64,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let message = format!("Block not available at height {}", height);
		Self::BlockNotAvailable {
			height,
			context: Box::new(ErrorContext::new_with_log(message, source, metadata)),
		}
	}

	/// Creates a receipt not available error
	pub fn receipt_not_available(
		tx_hash: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let tx_hash = tx_hash.into();
		let message = format!("Receipt not available for transaction {}", &tx_hash);
		Self::ReceiptNotAvailable {
			tx_hash,
			context: Box::new(ErrorContext::new_with_log(message, source, metadata)),
		}
	}
}

impl TraceableError for ClientError {
	fn trace_id(&self) -> String {
		match self {
			ClientError::RpcError(context) => context.trace_id.clone(),
			ClientError::ResponseParseError(context) => context.trace_id.clone(),
			ClientError::BlockNotAvailable { context, .. } => context.trace_id.clone(),
			ClientError::ReceiptNotAvailable { context, .. } => context.trace_id.clone(),
		}
	}
}
