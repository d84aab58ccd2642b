//! Configuration loading and validation.
//!
//! All settings come from CLI flags or environment variables (a `.env` file
//! is loaded by `main` before parsing). The watch list and the notification
//! channel settings are validated at startup; monitoring never starts without
//! at least one usable channel.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Configuration errors raised during startup validation.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The watch address list is empty after normalization
	#[error("watch address list is empty: set WATCH_ADDRESSES to one or more addresses")]
	EmptyWatchList,

	/// Neither email nor Telegram settings are complete
	#[error("no notification channel configured: set the EMAIL_* or TELEGRAM_* settings")]
	NoNotificationChannel,
}

/// Runtime configuration for the monitor.
#[derive(Debug, Clone, Parser)]
#[command(name = "contract-activity-monitor", version, about)]
pub struct MonitorConfig {
	/// JSON-RPC endpoint of the chain to monitor
	#[arg(
		long,
		env = "AVALANCHE_RPC_URL",
		default_value = "https://api.avax.network/ext/bc/C/rpc"
	)]
	pub rpc_url: String,

	/// Comma-separated list of addresses to watch
	#[arg(long, env = "WATCH_ADDRESSES", value_delimiter = ',')]
	pub watch_addresses: Vec<String>,

	/// Seconds between regular scan cycles
	#[arg(long, env = "POLL_INTERVAL", default_value_t = 60)]
	pub poll_interval_secs: u64,

	/// Maximum number of blocks processed in a single scan cycle
	#[arg(long, env = "MAX_BLOCKS_PER_CYCLE", default_value_t = 100)]
	pub max_blocks_per_cycle: u64,

	/// Number of blocks fetched concurrently within a cycle
	#[arg(long, env = "FETCH_BATCH_SIZE", default_value_t = 10)]
	pub fetch_batch_size: usize,

	/// Delay before the follow-up cycle when a backlog remains
	#[arg(long, env = "CATCH_UP_DELAY_SECS", default_value_t = 1)]
	pub catch_up_delay_secs: u64,

	/// Base URL for transaction links in notifications
	#[arg(long, env = "EXPLORER_BASE_URL", default_value = "https://snowtrace.io/tx")]
	pub explorer_base_url: String,

	/// Sender address for email notifications
	#[arg(long, env = "EMAIL_FROM")]
	pub email_from: Option<String>,

	/// Recipient address for email notifications
	#[arg(long, env = "EMAIL_TO")]
	pub email_to: Option<String>,

	/// SMTP server host
	#[arg(long, env = "EMAIL_SMTP_HOST")]
	pub smtp_host: Option<String>,

	/// SMTP server port
	#[arg(long, env = "EMAIL_SMTP_PORT", default_value_t = 587)]
	pub smtp_port: u16,

	/// SMTP username
	#[arg(long, env = "EMAIL_SMTP_USER")]
	pub smtp_user: Option<String>,

	/// SMTP password
	#[arg(long, env = "EMAIL_SMTP_PASSWORD")]
	pub smtp_password: Option<String>,

	/// Telegram bot token
	#[arg(long, env = "TELEGRAM_BOT_TOKEN")]
	pub telegram_bot_token: Option<String>,

	/// Telegram chat id notifications are sent to
	#[arg(long, env = "TELEGRAM_CHAT_ID")]
	pub telegram_chat_id: Option<String>,
}

/// Complete SMTP settings for the email channel.
#[derive(Debug, Clone)]
pub struct EmailSettings {
	pub from: String,
	pub to: String,
	pub smtp_host: String,
	pub smtp_port: u16,
	pub smtp_user: String,
	pub smtp_password: String,
}

/// Complete settings for the Telegram channel.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
	pub bot_token: String,
	pub chat_id: String,
}

impl MonitorConfig {
	/// Returns the watch addresses trimmed, lower-cased and deduplicated,
	/// preserving first-seen order.
	pub fn normalized_watch_addresses(&self) -> Vec<String> {
		let mut seen = Vec::new();
		for raw in &self.watch_addresses {
			let address = raw.trim().to_lowercase();
			if !address.is_empty() && !seen.contains(&address) {
				seen.push(address);
			}
		}
		seen
	}

	/// Returns the email settings when every required field is present.
	pub fn email_settings(&self) -> Option<EmailSettings> {
		match (
			&self.email_from,
			&self.email_to,
			&self.smtp_host,
			&self.smtp_user,
			&self.smtp_password,
		) {
			(Some(from), Some(to), Some(host), Some(user), Some(password)) => {
				Some(EmailSettings {
					from: from.clone(),
					to: to.clone(),
					smtp_host: host.clone(),
					smtp_port: self.smtp_port,
					smtp_user: user.clone(),
					smtp_password: password.clone(),
				})
			}
			_ => None,
		}
	}

	/// Returns the Telegram settings when both fields are present.
	pub fn telegram_settings(&self) -> Option<TelegramSettings> {
		match (&self.telegram_bot_token, &self.telegram_chat_id) {
			(Some(bot_token), Some(chat_id)) => Some(TelegramSettings {
				bot_token: bot_token.clone(),
				chat_id: chat_id.clone(),
			}),
			_ => None,
		}
	}

	/// Validates the startup configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.normalized_watch_addresses().is_empty() {
			return Err(ConfigError::EmptyWatchList);
		}
		if self.email_settings().is_none() && self.telegram_settings().is_none() {
			return Err(ConfigError::NoNotificationChannel);
		}
		Ok(())
	}

	/// Interval between regular scan cycles.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(self.poll_interval_secs)
	}

	/// Delay before the follow-up cycle during catch-up.
	pub fn catch_up_delay(&self) -> Duration {
		Duration::from_secs(self.catch_up_delay_secs)
	}
}
