//! Ledger errors.

use crate::auth::Role;
use rebase_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("base rate must decrease: current {current}, attempted {attempted}")]
    RateMustDecrease { current: u128, attempted: u128 },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, approved {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("{caller} lacks the {role} capability")]
    Unauthorized { caller: AccountId, role: Role },

    #[error("insufficient custody reserve: need {needed}, held {available}")]
    InsufficientReserve { needed: u128, available: u128 },

    #[error("arithmetic overflow in accrual computation")]
    Overflow,

    #[error("storage error: {0}")]
    Store(#[from] rebase_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
