//! Global base rate offered to newly funded accounts.

use crate::error::LedgerError;
use rebase_types::Timestamp;
use serde::{Deserialize, Serialize};

/// One accepted base-rate change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateChange {
    pub previous: u128,
    pub rate: u128,
    pub at: Timestamp,
}

/// Holds the single global base rate.
///
/// The rate only ever moves down. Existing holders keep whatever personal rate
/// they were credited with, so a decrease only affects accounts that are
/// funded from empty afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateController {
    base_rate: u128,
    /// Every accepted change, oldest first.
    changes: Vec<RateChange>,
}

impl RateController {
    pub fn new(initial_rate: u128) -> Self {
        Self {
            base_rate: initial_rate,
            changes: Vec::new(),
        }
    }

    pub fn current_base_rate(&self) -> u128 {
        self.base_rate
    }

    /// Replace the base rate with a strictly lower one.
    ///
    /// Equal or higher values fail with `RateMustDecrease` and leave the
    /// controller untouched.
    pub fn set_base_rate(
        &mut self,
        new_rate: u128,
        at: Timestamp,
    ) -> Result<RateChange, LedgerError> {
        if new_rate >= self.base_rate {
            return Err(LedgerError::RateMustDecrease {
                current: self.base_rate,
                attempted: new_rate,
            });
        }
        let change = RateChange {
            previous: self.base_rate,
            rate: new_rate,
            at,
        };
        self.base_rate = new_rate;
        self.changes.push(change.clone());
        Ok(change)
    }

    pub fn changes(&self) -> &[RateChange] {
        &self.changes
    }
}
