//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators (clock, storage, cross-domain transport) are
//! abstracted behind traits or plain values. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod network;
pub mod store;

pub use clock::NullClock;
pub use network::NullTransport;
pub use store::NullLedgerStore;
