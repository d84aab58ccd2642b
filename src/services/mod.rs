//! Service layer implementing the monitor's core functionality.

pub mod blockchain;
pub mod blockwatcher;
pub mod filter;
pub mod notification;
