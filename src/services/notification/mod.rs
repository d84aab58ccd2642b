//! Notification channels and dispatch.
//!
//! The scan engine hands each resolved match to [`NotificationService`] as a
//! (subject, body) pair; the service fans it out to every configured channel
//! concurrently. A failing channel is logged and never blocks or fails the
//! other channels or the caller.

mod email;
mod error;
mod telegram;

use async_trait::async_trait;

use crate::models::MonitorConfig;

pub use email::EmailNotifier;
pub use error::NotificationError;
pub use telegram::TelegramNotifier;

/// Interface implemented by every notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
	/// Short channel name used in logs
	fn channel(&self) -> &'static str;

	/// Delivers one message through this channel
	async fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError>;
}

/// Dispatches notifications to all configured channels
pub struct NotificationService {
	channels: Vec<Box<dyn Notifier>>,
}

impl NotificationService {
	/// Creates a service over an explicit set of channels
	pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
		Self { channels }
	}

	/// Builds the channels described by the configuration
	///
	/// Returns an error when a configured channel cannot be constructed;
	/// channel *absence* is handled by `MonitorConfig::validate`, not here.
	pub fn from_config(config: &MonitorConfig) -> Result<Self, NotificationError> {
		let mut channels: Vec<Box<dyn Notifier>> = Vec::new();

		if let Some(settings) = config.email_settings() {
			channels.push(Box::new(EmailNotifier::new(settings)?));
		}
		if let Some(settings) = config.telegram_settings() {
			channels.push(Box::new(TelegramNotifier::new(settings)?));
		}

		Ok(Self::new(channels))
	}

	/// Number of configured channels
	pub fn channel_count(&self) -> usize {
		self.channels.len()
	}

	/// Names of the configured channels, for the startup banner
	pub fn channel_names(&self) -> Vec<&'static str> {
		self.channels.iter().map(|c| c.channel()).collect()
	}

	/// Sends one message through every channel
	///
	/// Deliveries run concurrently; per-channel failures are logged and
	/// swallowed so one broken channel cannot affect the others.
	pub async fn notify(&self, subject: &str, body: &str) {
		let deliveries = self.channels.iter().map(|channel| async move {
			if let Err(e) = channel.notify(subject, body).await {
				tracing::error!(
					channel = channel.channel(),
					"failed to deliver notification: {}",
					e
				);
			}
		});

		futures::future::join_all(deliveries).await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	struct MockChannel {
		name: &'static str,
		delivered: Arc<AtomicUsize>,
		fail: bool,
	}

	#[async_trait]
	impl Notifier for MockChannel {
		fn channel(&self) -> &'static str {
			self.name
		}

		async fn notify(&self, _subject: &str, _body: &str) -> Result<(), NotificationError> {
			if self.fail {
				return Err(NotificationError::delivery_failed(
					"simulated failure",
					None,
					None,
				));
			}
			self.delivered.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	#[tokio::test]
	async fn test_notify_fans_out_to_all_channels() {
		let first = Arc::new(AtomicUsize::new(0));
		let second = Arc::new(AtomicUsize::new(0));
		let service = NotificationService::new(vec![
			Box::new(MockChannel {
				name: "first",
				delivered: first.clone(),
				fail: false,
			}),
			Box::new(MockChannel {
				name: "second",
				delivered: second.clone(),
				fail: false,
			}),
		]);

		service.notify("subject", "body").await;

		assert_eq!(first.load(Ordering::SeqCst), 1);
		assert_eq!(second.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_failing_channel_does_not_block_others() {
		let delivered = Arc::new(AtomicUsize::new(0));
		let service = NotificationService::new(vec![
			Box::new(MockChannel {
				name: "broken",
				delivered: Arc::new(AtomicUsize::new(0)),
				fail: true,
			}),
			Box::new(MockChannel {
				name: "working",
				delivered: delivered.clone(),
				fail: false,
			}),
		]);

		// Must not fail or panic even though one channel errors
		service.notify("subject", "body").await;

		assert_eq!(delivered.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_empty_service_is_a_no_op() {
		let service = NotificationService::new(vec![]);
		assert_eq!(service.channel_count(), 0);
		service.notify("subject", "body").await;
	}
}
