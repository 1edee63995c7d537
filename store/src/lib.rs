//! Abstract storage traits for the rebase ledger.
//!
//! Storage backends implement these traits; the ledger depends only on the
//! traits and serializes its own types into opaque bytes.

pub mod error;
pub mod ledger;

pub use error::StoreError;
pub use ledger::LedgerStore;
