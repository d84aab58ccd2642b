//! Shared utilities used across the application.

pub mod logging;

pub use logging::error::{ErrorContext, TraceableError};
pub use logging::setup_logging;
