//! Concurrent block range fetcher.
//!
//! Fetches an inclusive height range in fixed-width sub-batches. Calls within
//! a sub-batch run concurrently; sub-batches run sequentially to bound the
//! load on the RPC endpoint. A failed fetch is logged and recorded as a
//! missing block instead of aborting the range.

use futures::future::join_all;

use crate::{models::Block, services::blockchain::LedgerClient};

/// One height of a fetched range.
///
/// `block` is `None` when the fetch for that height failed; the height is
/// still counted as processed by the caller.
#[derive(Debug, Clone)]
pub struct FetchedBlock {
	pub height: u64,
	pub block: Option<Block>,
}

/// Fetches every block in `[start, end]`, in ascending height order.
///
/// # Arguments
/// * `client` - The ledger client to fetch through
/// * `start` - First height of the range (inclusive)
/// * `end` - Last height of the range (inclusive)
/// * `batch_size` - Number of concurrent fetches per sub-batch
///
/// # Returns
/// * `Vec<FetchedBlock>` - One entry per height, ordered by height
pub async fn fetch_block_range<C: LedgerClient>(
	client: &C,
	start: u64,
	end: u64,
	batch_size: usize,
) -> Vec<FetchedBlock> {
	let mut fetched = Vec::with_capacity((end.saturating_sub(start) + 1) as usize);
	if start > end {
		return fetched;
	}

	let heights: Vec<u64> = (start..=end).collect();
	for sub_batch in heights.chunks(batch_size.max(1)) {
		let fetches = sub_batch.iter().map(|&height| {
			let client = client.clone();
			async move {
				match client.get_block_with_transactions(height).await {
					Ok(block) => FetchedBlock {
						height,
						block: Some(block),
					},
					Err(e) => {
						tracing::error!(height, "failed to fetch block: {}", e);
						FetchedBlock {
							height,
							block: None,
						}
					}
				}
			}
		});

		// join_all preserves input order, so results stay height-ordered
		fetched.extend(join_all(fetches).await);
	}

	fetched
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::collections::HashSet;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::{Arc, Mutex};

	use crate::models::TransactionReceipt;

	#[derive(Clone, Default)]
	struct MockClient {
		requested: Arc<Mutex<Vec<u64>>>,
		failing_heights: Arc<HashSet<u64>>,
		max_concurrent: Arc<AtomicUsize>,
		current: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl LedgerClient for MockClient {
		async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
			Ok(0)
		}

		async fn get_block_with_transactions(
			&self,
			height: u64,
		) -> Result<Block, anyhow::Error> {
			let active = self.current.fetch_add(1, Ordering::SeqCst) + 1;
			self.max_concurrent.fetch_max(active, Ordering::SeqCst);
			tokio::task::yield_now().await;
			self.current.fetch_sub(1, Ordering::SeqCst);

			self.requested.lock().unwrap().push(height);
			if self.failing_heights.contains(&height) {
				anyhow::bail!("block {} unavailable", height);
			}
			Ok(Block {
				number: height,
				hash: Some(format!("0xhash{}", height)),
				transactions: vec![],
			})
		}

		async fn get_transaction_receipt(
			&self,
			_tx_hash: &str,
		) -> Result<TransactionReceipt, anyhow::Error> {
			anyhow::bail!("not used")
		}
	}

	#[tokio::test]
	async fn test_fetches_full_range_in_order() {
		let client = MockClient::default();
		let fetched = fetch_block_range(&client, 501, 505, 10).await;

		let heights: Vec<u64> = fetched.iter().map(|f| f.height).collect();
		assert_eq!(heights, vec![501, 502, 503, 504, 505]);
		assert!(fetched.iter().all(|f| f.block.is_some()));
	}

	#[tokio::test]
	async fn test_each_height_requested_exactly_once() {
		let client = MockClient::default();
		fetch_block_range(&client, 1, 25, 10).await;

		let mut requested = client.requested.lock().unwrap().clone();
		requested.sort_unstable();
		assert_eq!(requested, (1..=25).collect::<Vec<u64>>());
	}

	#[tokio::test]
	async fn test_failed_fetch_becomes_missing_block() {
		let client = MockClient {
			failing_heights: Arc::new(HashSet::from([503])),
			..Default::default()
		};
		let fetched = fetch_block_range(&client, 501, 505, 10).await;

		assert_eq!(fetched.len(), 5);
		assert!(fetched[2].block.is_none());
		assert_eq!(fetched[2].height, 503);
		assert!(fetched[0].block.is_some());
		assert!(fetched[4].block.is_some());
	}

	#[tokio::test]
	async fn test_concurrency_bounded_by_batch_size() {
		let client = MockClient::default();
		fetch_block_range(&client, 1, 40, 10).await;

		assert!(client.max_concurrent.load(Ordering::SeqCst) <= 10);
	}

	#[tokio::test]
	async fn test_empty_range() {
		let client = MockClient::default();
		let fetched = fetch_block_range(&client, 10, 9, 10).await;
		assert!(fetched.is_empty());
	}
}
