//! Receipt correlation for match events.
//!
//! Enriches each match event with its execution outcome (status, gas used)
//! by fetching transaction receipts concurrently. A match whose receipt
//! cannot be retrieved is dropped from the cycle's results with a warning;
//! there is no retry and the block range is never revisited.

use futures::future::join_all;

use crate::{
	models::TransactionReceipt,
	services::{blockchain::LedgerClient, filter::MatchEvent},
};

/// A match event paired with its transaction receipt.
#[derive(Debug, Clone)]
pub struct ResolvedMatch {
	pub event: MatchEvent,
	pub receipt: TransactionReceipt,
}

/// Resolves receipts for a cycle's match events.
///
/// Receipt fetches run concurrently; results keep the input event order.
/// Events whose receipt fetch fails are dropped.
pub async fn resolve_receipts<C: LedgerClient>(
	client: &C,
	events: Vec<MatchEvent>,
) -> Vec<ResolvedMatch> {
	let resolutions = events.into_iter().map(|event| {
		let client = client.clone();
		async move {
			match client.get_transaction_receipt(&event.transaction.hash).await {
				Ok(receipt) => Some(ResolvedMatch { event, receipt }),
				Err(e) => {
					tracing::warn!(
						tx_hash = %event.transaction.hash,
						"dropping match, receipt unavailable: {}",
						e
					);
					None
				}
			}
		}
	});

	join_all(resolutions).await.into_iter().flatten().collect()
}
