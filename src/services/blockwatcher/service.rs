//! Scan cycle orchestration and scheduling.
//!
//! A cycle is admitted through the single-flight guard, reads the chain head,
//! processes at most `max_blocks_per_cycle` new blocks (fetch, match, resolve,
//! notify) and advances the cursor to the end of the processed range. When
//! processing left a backlog behind the head, the next cycle is scheduled
//! after a short catch-up delay instead of the regular poll interval.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
	models::{MonitorConfig, Transaction, TransactionReceipt},
	services::{
		blockchain::LedgerClient,
		blockwatcher::{
			correlator::resolve_receipts,
			error::BlockWatcherError,
			fetcher::fetch_block_range,
			state::{CycleGuard, ScanState},
		},
		filter::{filter_block, MatchEvent, WatchList},
		notification::NotificationService,
	},
};

/// Per-cycle processing limits.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
	/// Maximum number of blocks processed in one cycle
	pub max_blocks_per_cycle: u64,

	/// Number of blocks fetched concurrently
	pub fetch_batch_size: usize,
}

impl Default for ScanPolicy {
	fn default() -> Self {
		Self {
			max_blocks_per_cycle: 100,
			fetch_batch_size: 10,
		}
	}
}

impl ScanPolicy {
	/// Builds the policy from the runtime configuration.
	pub fn from_config(config: &MonitorConfig) -> Self {
		Self {
			max_blocks_per_cycle: config.max_blocks_per_cycle.max(1),
			fetch_batch_size: config.fetch_batch_size.max(1),
		}
	}
}

/// Result of one scan cycle trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
	/// A cycle was already in flight; the trigger was dropped
	Skipped,

	/// First cycle: the cursor was initialized to the chain head
	Started { height: u64 },

	/// No blocks past the cursor
	Idle,

	/// A block range was processed and the cursor advanced
	Completed {
		/// Number of block heights processed (including missing blocks)
		processed: u64,
		/// Number of matches that were resolved and dispatched
		matches: usize,
		/// Whether blocks remain between the new cursor and the head
		backlog: bool,
	},

	/// The cycle failed; the cursor is unchanged and will be retried
	Failed,
}

/// Runs a single scan cycle against the given collaborators.
///
/// Never returns an error: failures are logged and reported as
/// [`CycleOutcome::Failed`] with the cursor left unchanged. The single-flight
/// guard is released on every path.
pub async fn run_scan_cycle<C: LedgerClient>(
	state: &ScanState,
	client: &C,
	watch_list: &WatchList,
	notifications: &NotificationService,
	policy: &ScanPolicy,
	explorer_base_url: &str,
) -> CycleOutcome {
	let Some(guard) = state.try_begin_cycle() else {
		tracing::info!("previous scan cycle still in progress, skipping");
		return CycleOutcome::Skipped;
	};

	match scan_once(
		&guard,
		client,
		watch_list,
		notifications,
		policy,
		explorer_base_url,
	)
	.await
	{
		Ok(outcome) => outcome,
		Err(e) => {
			tracing::error!("scan cycle failed: {}", e);
			CycleOutcome::Failed
		}
	}
}

/// The admitted cycle body. Guard release and failure capture happen in
/// [`run_scan_cycle`].
async fn scan_once<C: LedgerClient>(
	guard: &CycleGuard<'_>,
	client: &C,
	watch_list: &WatchList,
	notifications: &NotificationService,
	policy: &ScanPolicy,
	explorer_base_url: &str,
) -> Result<CycleOutcome, BlockWatcherError> {
	let head = client
		.get_latest_block_number()
		.await
		.map_err(|e| BlockWatcherError::head_query_error(e.to_string(), Some(e.into()), None))?;

	let Some(cursor) = guard.cursor() else {
		guard.initialize_cursor(head);
		tracing::info!(head, "starting monitoring from current head");

		let body = format!(
			"Started monitoring {} address(es):\n{}\n\nStarting from block {}",
			watch_list.len(),
			watch_list.addresses().join("\n"),
			head
		);
		notifications.notify("Contract Monitor Started", &body).await;

		return Ok(CycleOutcome::Started { height: head });
	};

	if head <= cursor {
		tracing::debug!(head, cursor, "no new blocks");
		return Ok(CycleOutcome::Idle);
	}

	let count = (head - cursor).min(policy.max_blocks_per_cycle);
	let range_start = cursor + 1;
	let range_end = cursor + count;
	tracing::info!(range_start, range_end, head, "scanning block range");

	let fetched =
		fetch_block_range(client, range_start, range_end, policy.fetch_batch_size).await;

	// Missing blocks were already logged by the fetcher; their heights still
	// count as processed and are never revisited.
	let mut events: Vec<MatchEvent> = Vec::new();
	for entry in &fetched {
		if let Some(block) = &entry.block {
			events.extend(filter_block(block, watch_list));
		}
	}

	let resolved = resolve_receipts(client, events).await;
	let matches = resolved.len();

	for resolved_match in &resolved {
		let subject = format!(
			"Contract Activity Detected - Block {}",
			resolved_match.event.transaction.block_number
		);
		let body = format!(
			"Monitored Contract: {}\n\n{}",
			resolved_match.event.matched_address,
			format_transaction(
				&resolved_match.event.transaction,
				&resolved_match.receipt,
				explorer_base_url
			)
		);
		notifications.notify(&subject, &body).await;
	}

	guard.advance_cursor_to(range_end);

	let backlog = head > range_end;
	if backlog {
		tracing::info!(
			remaining = head - range_end,
			"more blocks to scan, scheduling catch-up cycle"
		);
	}

	Ok(CycleOutcome::Completed {
		processed: count,
		matches,
		backlog,
	})
}

/// Renders the notification body for one matched transaction.
fn format_transaction(
	transaction: &Transaction,
	receipt: &TransactionReceipt,
	explorer_base_url: &str,
) -> String {
	let to = transaction
		.to
		.as_deref()
		.unwrap_or("Contract Creation")
		.to_string();

	format!(
		"Transaction Hash: {}\n\
		 Block Number: {}\n\
		 From: {}\n\
		 To: {}\n\
		 Value: {} AVAX\n\
		 Gas Used: {}\n\
		 Status: {}\n\
		 \nView on Explorer: {}/{}",
		transaction.hash,
		transaction.block_number,
		transaction.from,
		to,
		transaction.value_formatted(),
		receipt.gas_used,
		receipt.status_label(),
		explorer_base_url.trim_end_matches('/'),
		transaction.hash
	)
}

/// The long-running scanner: owns the scan state and drives cycles on a
/// timer, switching to the catch-up delay while a backlog remains.
pub struct BlockWatcher<C: LedgerClient> {
	state: Arc<ScanState>,
	client: C,
	watch_list: WatchList,
	notifications: Arc<NotificationService>,
	policy: ScanPolicy,
	explorer_base_url: String,
	poll_interval: Duration,
	catch_up_delay: Duration,
}

impl<C: LedgerClient> BlockWatcher<C> {
	/// Creates a watcher from the runtime configuration.
	pub fn new(
		config: &MonitorConfig,
		client: C,
		notifications: Arc<NotificationService>,
	) -> Self {
		Self {
			state: Arc::new(ScanState::new()),
			client,
			watch_list: WatchList::new(config.normalized_watch_addresses()),
			notifications,
			policy: ScanPolicy::from_config(config),
			explorer_base_url: config.explorer_base_url.clone(),
			poll_interval: config.poll_interval(),
			catch_up_delay: config.catch_up_delay(),
		}
	}

	/// Runs scan cycles until the token is cancelled.
	///
	/// The first cycle runs immediately; afterwards the delay between cycles
	/// is the catch-up delay when the previous cycle reported a backlog and
	/// the poll interval otherwise. Cancellation does not drain an in-flight
	/// cycle's notifications.
	pub async fn run(&self, cancel: CancellationToken) {
		let mut delay = Duration::ZERO;

		loop {
			tokio::select! {
				_ = cancel.cancelled() => {
					tracing::info!("shutdown requested, stopping block watcher");
					return;
				}
				_ = tokio::time::sleep(delay) => {}
			}

			let outcome = run_scan_cycle(
				&self.state,
				&self.client,
				&self.watch_list,
				&self.notifications,
				&self.policy,
				&self.explorer_base_url,
			)
			.await;

			delay = match outcome {
				CycleOutcome::Completed { backlog: true, .. } => self.catch_up_delay,
				_ => self.poll_interval,
			};
		}
	}
}
