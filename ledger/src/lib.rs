//! Rebase accounting engine.
//!
//! Each holder's balance grows linearly at a personal rate locked in when the
//! holder was last funded from empty (or set verbatim by a minter). Interest is
//! computed lazily and folded into principal ("materialized") whenever an
//! operation is about to change that holder's principal.
//!
//! `accrued = principal * (SCALE + rate * elapsed) / SCALE`
//!
//! This crate handles:
//! - Account records and on-demand accrual
//! - The global base rate, which may only decrease
//! - Credit/debit for authorized minters and burners
//! - Holder transfers with rate adoption for empty recipients
//! - A reference custody vault and snapshot persistence

pub mod account;
pub mod auth;
pub mod custody;
pub mod engine;
pub mod error;
pub mod event;
pub mod persist;
pub mod rate;
pub mod transfer;

pub use account::Account;
pub use auth::{Authority, Role};
pub use custody::Vault;
pub use engine::AccrualLedger;
pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent};
pub use rate::{RateChange, RateController};
pub use transfer::UNLIMITED_ALLOWANCE;
