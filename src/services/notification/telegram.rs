//! Telegram notification channel.
//!
//! Sends messages through the Bot API `sendMessage` endpoint with HTML
//! formatting. Transient failures are retried a bounded number of times with
//! a growing delay before the delivery is reported as failed.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::{
	models::TelegramSettings,
	services::notification::{error::NotificationError, Notifier},
};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_SECS: u64 = 2;

/// Escapes the characters the Bot API treats as HTML markup.
fn escape_html(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Telegram notifier
pub struct TelegramNotifier {
	settings: TelegramSettings,
	client: reqwest::Client,
	api_base: String,
}

impl std::fmt::Debug for TelegramNotifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TelegramNotifier")
			.field("chat_id", &self.settings.chat_id)
			.field("api_base", &"<redacted>")
			.finish()
	}
}

impl TelegramNotifier {
	/// Creates a notifier for the official Bot API endpoint
	pub fn new(settings: TelegramSettings) -> Result<Self, NotificationError> {
		let api_base = format!("https://api.telegram.org/bot{}", settings.bot_token);
		Self::with_api_base(settings, api_base)
	}

	/// Creates a notifier against a custom API base URL
	///
	/// Used by tests to point the notifier at a local mock server.
	pub fn with_api_base(
		settings: TelegramSettings,
		api_base: String,
	) -> Result<Self, NotificationError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(15))
			.build()
			.map_err(|e| {
				NotificationError::invalid_configuration(
					"failed to build Telegram HTTP client",
					Some(e.into()),
					None,
				)
			})?;

		Ok(Self {
			settings,
			client,
			api_base,
		})
	}

	async fn send_message(&self, text: &str) -> Result<(), NotificationError> {
		for attempt in 0..MAX_RETRIES {
			match self
				.client
				.post(format!("{}/sendMessage", self.api_base))
				.json(&json!({
					"chat_id": self.settings.chat_id,
					"text": text,
					"parse_mode": "HTML",
					"disable_web_page_preview": true,
				}))
				.send()
				.await
			{
				Ok(response) if response.status().is_success() => return Ok(()),
				Ok(response) => {
					tracing::warn!(
						"Telegram send attempt {}/{} failed: HTTP {}",
						attempt + 1,
						MAX_RETRIES,
						response.status()
					);
				}
				Err(e) => {
					tracing::warn!(
						"Telegram send attempt {}/{} failed: {}",
						attempt + 1,
						MAX_RETRIES,
						e
					);
				}
			}

			if attempt < MAX_RETRIES - 1 {
				tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS * (attempt as u64 + 1)))
					.await;
			}
		}

		Err(NotificationError::delivery_failed(
			format!("Telegram delivery failed after {} attempts", MAX_RETRIES),
			None,
			Some(HashMap::from([(
				"chat_id".to_string(),
				self.settings.chat_id.clone(),
			)])),
		))
	}
}

#[async_trait]
impl Notifier for TelegramNotifier {
	fn channel(&self) -> &'static str {
		"telegram"
	}

	async fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
		let message = format!("<b>{}</b>\n\n{}", escape_html(subject), escape_html(body));
		self.send_message(&message).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn create_test_settings() -> TelegramSettings {
		TelegramSettings {
			bot_token: "test-token".to_string(),
			chat_id: "12345".to_string(),
		}
	}

	#[tokio::test]
	async fn test_notify_sends_html_message() {
		let mut server = mockito::Server::new_async().await;
		let mock = server
			.mock("POST", "/sendMessage")
			.match_body(mockito::Matcher::PartialJson(serde_json::json!({
				"chat_id": "12345",
				"text": "<b>Subject</b>\n\nBody line",
				"parse_mode": "HTML",
			})))
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(r#"{"ok":true}"#)
			.create_async()
			.await;

		let notifier =
			TelegramNotifier::with_api_base(create_test_settings(), server.url()).unwrap();

		notifier.notify("Subject", "Body line").await.unwrap();
		mock.assert_async().await;
	}

	#[tokio::test]
	async fn test_notify_escapes_html_in_subject_and_body() {
		let mut server = mockito::Server::new_async().await;
		let mock = server
			.mock("POST", "/sendMessage")
			.match_body(mockito::Matcher::PartialJson(serde_json::json!({
				"text": "<b>Alert &amp; update</b>\n\n1 &lt; 2 &gt; 0",
			})))
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(r#"{"ok":true}"#)
			.create_async()
			.await;

		let notifier =
			TelegramNotifier::with_api_base(create_test_settings(), server.url()).unwrap();

		notifier.notify("Alert & update", "1 < 2 > 0").await.unwrap();
		mock.assert_async().await;
	}

	#[tokio::test]
	async fn test_notify_retries_then_fails() {
		let mut server = mockito::Server::new_async().await;
		let mock = server
			.mock("POST", "/sendMessage")
			.with_status(500)
			.expect(MAX_RETRIES as usize)
			.create_async()
			.await;

		let notifier =
			TelegramNotifier::with_api_base(create_test_settings(), server.url()).unwrap();

		let result = notifier.notify("Subject", "Body").await;
		assert!(matches!(
			result,
			Err(NotificationError::DeliveryFailed(_))
		));
		mock.assert_async().await;
	}
}
