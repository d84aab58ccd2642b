//! Error context utilities.
//!
//! Provides the [`ErrorContext`] wrapper that service error types embed to
//! carry a human-readable message, an optional source error, optional
//! key/value metadata, and a trace id that ties log lines to error values.

use std::collections::HashMap;

use uuid::Uuid;

/// Structured context attached to every service error.
///
/// The context is created at the error site and logged once at creation time
/// (via [`ErrorContext::new_with_log`]), so callers can propagate the error
/// without double-logging it.
#[derive(Debug)]
pub struct ErrorContext {
	/// Human-readable error message
	pub message: String,

	/// Underlying error that caused this one, if any
	pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,

	/// Additional key/value pairs describing the error site
	pub metadata: Option<HashMap<String, String>>,

	/// Unique id correlating this error with its log line
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context without logging it.
	pub fn new(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self {
			message: message.into(),
			source,
			metadata,
			trace_id: Uuid::new_v4().to_string(),
		}
	}

	/// Creates a new error context and logs it at error level.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		tracing::error!(trace_id = %context.trace_id, "{}", context.format_with_metadata());
		context
	}

	/// Formats the message with its metadata appended as `[key=value, ...]`.
	///
	/// Metadata keys are sorted so the output is stable.
	pub fn format_with_metadata(&self) -> String {
		match &self.metadata {
			Some(metadata) if !metadata.is_empty() => {
				let mut pairs: Vec<_> = metadata.iter().collect();
				pairs.sort_by(|a, b| a.0.cmp(b.0));
				let rendered = pairs
					.iter()
					.map(|(k, v)| format!("{}={}", k, v))
					.collect::<Vec<_>>()
					.join(", ");
				format!("{} [{}]", self.message, rendered)
			}
			_ => self.message.clone(),
		}
	}
}

impl std::fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_with_metadata())
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// Errors that expose the trace id of their embedded [`ErrorContext`].
pub trait TraceableError {
	/// Returns the trace id correlating this error with its log line.
	fn trace_id(&self) -> String;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_assigns_trace_id() {
		let context = ErrorContext::new("something failed", None, None);
		assert_eq!(context.message, "something failed");
		assert!(!context.trace_id.is_empty());
	}

	#[test]
	fn test_display_without_metadata() {
		let context = ErrorContext::new("plain message", None, None);
		assert_eq!(context.to_string(), "plain message");
	}

	#[test]
	fn test_display_with_sorted_metadata() {
		let metadata = HashMap::from([
			("height".to_string(), "42".to_string()),
			("chain".to_string(), "avalanche".to_string()),
		]);
		let context = ErrorContext::new("fetch failed", None, Some(metadata));
		assert_eq!(
			context.to_string(),
			"fetch failed [chain=avalanche, height=42]"
		);
	}

	#[test]
	fn test_source_is_preserved() {
		let source = std::io::Error::new(std::io::ErrorKind::Other, "inner");
		let context = ErrorContext::new("outer", Some(Box::new(source)), None);
		let source_ref = std::error::Error::source(&context).expect("source should be set");
		assert_eq!(source_ref.to_string(), "inner");
	}

	#[test]
	fn test_trace_ids_are_unique() {
		let a = ErrorContext::new("a", None, None);
		let b = ErrorContext::new("b", None, None);
		assert_ne!(a.trace_id, b.trace_id);
	}
}
