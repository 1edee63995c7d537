//! Requested amounts for balance-moving operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much an operation should move.
///
/// `All` replaces the "transfer everything" sentinel: it is resolved to the
/// account's full accrued balance at the start of the operation, after any
/// interest owed up to that instant has been taken into account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    /// Move exactly this many raw units.
    Exact(u128),
    /// Move the whole accrued balance.
    All,
}

impl Amount {
    /// Resolve to a concrete raw amount given the current full balance.
    pub fn resolve(self, full_balance: u128) -> u128 {
        match self {
            Self::Exact(n) => n,
            Self::All => full_balance,
        }
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self::Exact(raw)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::All => write!(f, "all"),
        }
    }
}
