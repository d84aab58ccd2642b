//! Notification error types.

use std::collections::HashMap;

use thiserror::Error;

use crate::utils::{ErrorContext, TraceableError};

/// Notification error type
#[derive(Debug, Error)]
pub enum NotificationError {
	/// Failure delivering a message through a channel
	#[error("Failed to deliver notification: {0}")]
	DeliveryFailed(Box<ErrorContext>),

	/// Channel settings are invalid (bad address, unparseable host, ...)
	#[error("Invalid notification configuration: {0}")]
	InvalidConfiguration(Box<ErrorContext>),
}

impl NotificationError {
	/// Creates a delivery failure error
	pub fn delivery_failed(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DeliveryFailed(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}

	/// Creates an invalid configuration error
	pub fn invalid_configuration(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidConfiguration(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}
}

impl TraceableError for NotificationError {
	fn trace_id(&self) -> String {
		match self {
			NotificationError::DeliveryFailed(context) => context.trace_id.clone(),
			NotificationError::InvalidConfiguration(context) => context.trace_id.clone(),
		}
	}
}
