//! Email notification channel.
//!
//! Delivers messages over SMTP using `lettre`'s async transport. Port 465 is
//! treated as implicit TLS; any other port negotiates STARTTLS.

use std::collections::HashMap;

use async_trait::async_trait;
use lettre::{
	message::header::ContentType, transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
	models::EmailSettings,
	services::notification::{error::NotificationError, Notifier},
};

/// Email notifier
pub struct EmailNotifier {
	settings: EmailSettings,
	transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for EmailNotifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EmailNotifier")
			.field("from", &self.settings.from)
			.field("to", &self.settings.to)
			.field("smtp_host", &self.settings.smtp_host)
			.finish()
	}
}

impl EmailNotifier {
	/// Creates a notifier from complete SMTP settings
	pub fn new(settings: EmailSettings) -> Result<Self, NotificationError> {
		let builder = if settings.smtp_port == 465 {
			AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
		}
		.map_err(|e| {
			NotificationError::invalid_configuration(
				format!("invalid SMTP host {}", settings.smtp_host),
				Some(e.into()),
				None,
			)
		})?;

		let transport = builder
			.port(settings.smtp_port)
			.credentials(Credentials::new(
				settings.smtp_user.clone(),
				settings.smtp_password.clone(),
			))
			.build();

		Ok(Self {
			settings,
			transport,
		})
	}

	/// Builds the email message for a subject/body pair
	fn build_message(&self, subject: &str, body: &str) -> Result<Message, NotificationError> {
		let invalid_address = |field: &str, e: lettre::address::AddressError| {
			NotificationError::invalid_configuration(
				format!("invalid {} address", field),
				Some(e.into()),
				None,
			)
		};

		Message::builder()
			.from(
				self.settings
					.from
					.parse()
					.map_err(|e| invalid_address("sender", e))?,
			)
			.to(self
				.settings
				.to
				.parse()
				.map_err(|e| invalid_address("recipient", e))?)
			.subject(subject)
			.header(ContentType::TEXT_PLAIN)
			.body(body.to_string())
			.map_err(|e| {
				NotificationError::invalid_configuration(
					"failed to build email message",
					Some(e.into()),
					None,
				)
			})
	}
}

#[async_trait]
impl Notifier for EmailNotifier {
	fn channel(&self) -> &'static str {
		"email"
	}

	async fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
		let message = self.build_message(subject, body)?;

		self.transport.send(message).await.map_err(|e| {
			NotificationError::delivery_failed(
				"SMTP delivery failed",
				Some(e.into()),
				Some(HashMap::from([(
					"smtp_host".to_string(),
					self.settings.smtp_host.clone(),
				)])),
			)
		})?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn create_test_settings() -> EmailSettings {
		EmailSettings {
			from: "monitor@example.com".to_string(),
			to: "alerts@example.com".to_string(),
			smtp_host: "smtp.example.com".to_string(),
			smtp_port: 587,
			smtp_user: "user".to_string(),
			smtp_password: "password123".to_string(),
		}
	}

	#[test]
	fn test_notifier_creation() {
		let notifier = EmailNotifier::new(create_test_settings()).unwrap();
		assert_eq!(notifier.channel(), "email");
	}

	#[test]
	fn test_build_message() {
		let notifier = EmailNotifier::new(create_test_settings()).unwrap();
		let message = notifier.build_message("Test Subject", "Test body");
		assert!(message.is_ok());
	}

	#[test]
	fn test_build_message_rejects_invalid_sender() {
		let mut settings = create_test_settings();
		settings.from = "not-an-address".to_string();
		let notifier = EmailNotifier::new(settings).unwrap();

		let result = notifier.build_message("Subject", "Body");
		assert!(matches!(
			result,
			Err(NotificationError::InvalidConfiguration(_))
		));
	}
}
