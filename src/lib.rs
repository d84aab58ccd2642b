//! A blockchain address-activity monitor.
//!
//! Scans an EVM chain for transactions that touch a configured set of
//! addresses and reports each one over email and/or Telegram. Progress is
//! tracked with an in-memory cursor; on restart the monitor resumes from the
//! current chain head.
//!
//! # Structure
//!
//! - `models`: chain data structures and runtime configuration
//! - `services`: the scan engine, RPC client, filtering and notifications
//! - `utils`: logging setup and error context plumbing

pub mod models;
pub mod services;
pub mod utils;
