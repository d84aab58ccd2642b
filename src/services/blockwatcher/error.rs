//! Block watcher error types.

use std::collections::HashMap;

use thiserror::Error;

use crate::utils::{ErrorContext, TraceableError};

/// Block watcher error type
///
/// Per-block and per-receipt failures are absorbed inside the cycle, so the
/// only failure that escapes to the cycle boundary is the head query.
#[derive(Debug, Error)]
pub enum BlockWatcherError {
	/// The chain head height could not be determined
	#[error("Failed to query chain head: {0}")]
	HeadQueryError(Box<ErrorContext>),
}

impl BlockWatcherError {
	/// Creates a head query error
	pub fn head_query_error(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::HeadQueryError(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}
}

impl TraceableError for BlockWatcherError {
	fn trace_id(&self) -> String {
		match self {
			BlockWatcherError::HeadQueryError(context) => context.trace_id.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_head_query_error_formatting() {
		let error = BlockWatcherError::head_query_error("RPC unreachable", None, None);
		assert_eq!(error.to_string(), "Failed to query chain head: RPC unreachable");
		assert!(!error.trace_id().is_empty());
	}

	#[test]
	fn test_head_query_error_with_metadata() {
		let metadata = HashMap::from([("url".to_string(), "http://localhost".to_string())]);
		let error = BlockWatcherError::head_query_error("timed out", None, Some(metadata));
		assert_eq!(
			error.to_string(),
			"Failed to query chain head: timed out [url=http://localhost]"
		);
	}
}
