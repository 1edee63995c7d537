//! Bridge errors.

use rebase_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport-level policy rejected the request before any ledger call.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("malformed rate payload: {0}")]
    PayloadDecode(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
