//! Main entry point for the contract activity monitor.
//!
//! Loads configuration, connects to the chain, and runs the block watcher
//! until the process receives SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use contract_activity_monitor::{
	models::MonitorConfig,
	services::{
		blockchain::EvmRpcClient, blockwatcher::BlockWatcher, notification::NotificationService,
	},
	utils::setup_logging,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	dotenvy::dotenv().ok();
	setup_logging();

	let config = MonitorConfig::parse();
	config.validate().context("invalid configuration")?;

	let watch_addresses = config.normalized_watch_addresses();
	tracing::info!(
		rpc_url = %config.rpc_url,
		poll_interval_secs = config.poll_interval_secs,
		"starting contract activity monitor"
	);
	for (index, address) in watch_addresses.iter().enumerate() {
		tracing::info!("watching address {}: {}", index + 1, address);
	}

	let notifications = Arc::new(
		NotificationService::from_config(&config)
			.context("failed to configure notification channels")?,
	);
	tracing::info!(
		channels = ?notifications.channel_names(),
		"notification channels configured"
	);

	let client = EvmRpcClient::new(&config.rpc_url)
		.await
		.context("failed to connect to RPC endpoint")?;

	let cancel = CancellationToken::new();
	let watcher = BlockWatcher::new(&config, client, notifications);
	let watcher_handle = tokio::spawn({
		let cancel = cancel.clone();
		async move { watcher.run(cancel).await }
	});

	shutdown_signal().await;
	tracing::info!("termination signal received, shutting down");
	cancel.cancel();
	watcher_handle.await.context("block watcher task panicked")?;

	Ok(())
}

/// Completes when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!("failed to listen for ctrl-c: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				tracing::error!("failed to listen for SIGTERM: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {}
		_ = terminate => {}
	}
}
