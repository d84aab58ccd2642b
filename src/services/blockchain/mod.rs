//! Ledger client services.
//!
//! Defines the client interface the scan engine consumes and the concrete
//! EVM JSON-RPC implementation of it.

mod client;
mod error;
mod transport;

pub use client::LedgerClient;
pub use error::ClientError;
pub use transport::EvmRpcClient;
