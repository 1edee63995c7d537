//! Fundamental types for the rebase ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account and domain identifiers, amounts, timestamps, and the fixed-point helpers
//! used by interest accrual.

pub mod address;
pub mod amount;
pub mod math;
pub mod network;
pub mod time;

pub use address::{AccountId, TokenId};
pub use amount::Amount;
pub use math::{mul_div, SCALE};
pub use network::DomainId;
pub use time::{Clock, Timestamp};
