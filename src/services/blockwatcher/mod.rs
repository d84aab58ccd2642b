//! Block watching service.
//!
//! The scan engine: tracks a progress cursor over the chain, fetches new
//! blocks in bounded batches, matches transactions against the watch list,
//! resolves execution outcomes, and dispatches notifications. At most one
//! scan cycle runs at a time.

mod correlator;
mod error;
mod fetcher;
mod service;
mod state;

pub use correlator::{resolve_receipts, ResolvedMatch};
pub use error::BlockWatcherError;
pub use fetcher::{fetch_block_range, FetchedBlock};
pub use service::{run_scan_cycle, BlockWatcher, CycleOutcome, ScanPolicy};
pub use state::{CycleGuard, ScanState};
