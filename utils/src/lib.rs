//! Shared utilities for the rebase ledger workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
