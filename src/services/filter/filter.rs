//! Watch list and block filtering implementation.
//!
//! The watch list is fixed for the process lifetime. Filtering walks a
//! block's transactions in order and emits at most one match event per
//! transaction: the watch list is scanned in insertion order and the first
//! entry matching either the sender or the recipient wins.

use crate::models::{Block, Transaction};

/// The fixed set of addresses the monitor watches.
///
/// Addresses are normalized (trimmed, lower-cased) and deduplicated at
/// construction; iteration order is insertion order, so matching is
/// deterministic within a run.
#[derive(Debug, Clone, Default)]
pub struct WatchList {
	addresses: Vec<String>,
}

impl WatchList {
	/// Creates a watch list from raw address strings.
	pub fn new(addresses: impl IntoIterator<Item = String>) -> Self {
		let mut normalized: Vec<String> = Vec::new();
		for raw in addresses {
			let address = raw.trim().to_lowercase();
			if !address.is_empty() && !normalized.contains(&address) {
				normalized.push(address);
			}
		}
		Self {
			addresses: normalized,
		}
	}

	/// Returns the normalized addresses in insertion order.
	pub fn addresses(&self) -> &[String] {
		&self.addresses
	}

	/// Whether the given (already lower-cased) address is watched.
	pub fn contains(&self, address: &str) -> bool {
		self.addresses.iter().any(|a| a == address)
	}

	pub fn len(&self) -> usize {
		self.addresses.len()
	}

	pub fn is_empty(&self) -> bool {
		self.addresses.is_empty()
	}
}

/// A transaction paired with the watch list entry it matched.
#[derive(Debug, Clone)]
pub struct MatchEvent {
	/// The matching transaction
	pub transaction: Transaction,

	/// The watch list address that matched (sender or recipient)
	pub matched_address: String,
}

/// Scans a block's transactions against the watch list.
///
/// Events are returned in transaction order. A transaction matching several
/// watch list entries produces exactly one event for the first entry that
/// matches.
pub fn filter_block(block: &Block, watch_list: &WatchList) -> Vec<MatchEvent> {
	let mut events = Vec::new();

	for transaction in &block.transactions {
		let from = transaction.from.to_lowercase();
		let to = transaction.to.as_ref().map(|t| t.to_lowercase());

		for address in watch_list.addresses() {
			let matches_sender = &from == address;
			let matches_recipient = to.as_deref() == Some(address.as_str());

			if matches_sender || matches_recipient {
				events.push(MatchEvent {
					transaction: transaction.clone(),
					matched_address: address.clone(),
				});
				break;
			}
		}
	}

	events
}

#[cfg(test)]
mod tests {
	use super::*;

	fn create_transaction(hash: &str, from: &str, to: Option<&str>) -> Transaction {
		Transaction {
			hash: hash.to_string(),
			from: from.to_string(),
			to: to.map(|t| t.to_string()),
			value: 0,
			block_number: 501,
		}
	}

	fn create_block(transactions: Vec<Transaction>) -> Block {
		Block {
			number: 501,
			hash: None,
			transactions,
		}
	}

	const ADDR_A: &str = "0xaaaa000000000000000000000000000000000001";
	const ADDR_B: &str = "0xbbbb000000000000000000000000000000000002";
	const ADDR_Y: &str = "0xcccc000000000000000000000000000000000003";
	const ADDR_Z: &str = "0xdddd000000000000000000000000000000000004";

	#[test]
	fn test_watch_list_normalization() {
		let watch_list = WatchList::new(vec![
			format!(" {} ", ADDR_A.to_uppercase().replace("0X", "0x")),
			ADDR_A.to_string(),
			String::new(),
		]);

		assert_eq!(watch_list.len(), 1);
		assert!(watch_list.contains(ADDR_A));
	}

	#[test]
	fn test_matches_sender_and_recipient() {
		let watch_list = WatchList::new(vec![ADDR_A.to_string(), ADDR_B.to_string()]);
		let block = create_block(vec![
			create_transaction("0x1", ADDR_A, Some(ADDR_Z)),
			create_transaction("0x2", ADDR_Y, Some(ADDR_B)),
			create_transaction("0x3", ADDR_Y, Some(ADDR_Z)),
		]);

		let events = filter_block(&block, &watch_list);

		assert_eq!(events.len(), 2);
		assert_eq!(events[0].transaction.hash, "0x1");
		assert_eq!(events[0].matched_address, ADDR_A);
		assert_eq!(events[1].transaction.hash, "0x2");
		assert_eq!(events[1].matched_address, ADDR_B);
	}

	#[test]
	fn test_one_event_per_transaction_when_both_entries_match() {
		let watch_list = WatchList::new(vec![ADDR_A.to_string(), ADDR_B.to_string()]);
		// Transaction from A to B matches both watch list entries
		let block = create_block(vec![create_transaction("0x1", ADDR_A, Some(ADDR_B))]);

		let events = filter_block(&block, &watch_list);

		assert_eq!(events.len(), 1);
		// First watch list entry wins
		assert_eq!(events[0].matched_address, ADDR_A);
	}

	#[test]
	fn test_matching_is_case_insensitive() {
		let watch_list = WatchList::new(vec![ADDR_A.to_string()]);
		let upper = ADDR_A.to_uppercase().replace("0X", "0x");
		let block = create_block(vec![create_transaction("0x1", &upper, None)]);

		let events = filter_block(&block, &watch_list);

		assert_eq!(events.len(), 1);
	}

	#[test]
	fn test_contract_creation_matches_on_sender_only() {
		let watch_list = WatchList::new(vec![ADDR_A.to_string()]);
		let block = create_block(vec![
			create_transaction("0x1", ADDR_A, None),
			create_transaction("0x2", ADDR_Y, None),
		]);

		let events = filter_block(&block, &watch_list);

		assert_eq!(events.len(), 1);
		assert_eq!(events[0].transaction.hash, "0x1");
	}

	#[test]
	fn test_no_events_for_unrelated_block() {
		let watch_list = WatchList::new(vec![ADDR_A.to_string()]);
		let block = create_block(vec![create_transaction("0x1", ADDR_Y, Some(ADDR_Z))]);

		assert!(filter_block(&block, &watch_list).is_empty());
	}

	#[test]
	fn test_empty_block_produces_no_events() {
		let watch_list = WatchList::new(vec![ADDR_A.to_string()]);
		let block = create_block(vec![]);

		assert!(filter_block(&block, &watch_list).is_empty());
	}
}
