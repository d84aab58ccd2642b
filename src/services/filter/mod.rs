//! Transaction filtering against the watch list.

mod filter;

pub use filter::{filter_block, MatchEvent, WatchList};
