//! Per-account accrual state.

use rebase_types::{mul_div, Timestamp, SCALE};
use serde::{Deserialize, Serialize};

/// Ledger record for a single holder.
///
/// `principal` only moves on materialization, credit, debit and transfer.
/// The displayed balance is derived from it on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Materialized amount, excluding interest accrued since `last_accrual`.
    pub principal: u128,
    /// Per-second rate locked to this holder, scaled by `SCALE`.
    pub personal_rate: u128,
    /// When interest was last folded into `principal`. `EPOCH` until first credit.
    pub last_accrual: Timestamp,
}

impl Account {
    /// `SCALE + personal_rate * elapsed`. Linear in elapsed time.
    pub fn growth_factor(&self, now: Timestamp) -> Option<u128> {
        let elapsed = u128::from(self.last_accrual.elapsed_since(now));
        self.personal_rate.checked_mul(elapsed)?.checked_add(SCALE)
    }

    /// `principal * growth_factor / SCALE`, floored. Zero principal stays zero.
    pub fn accrued_balance(&self, now: Timestamp) -> Option<u128> {
        if self.principal == 0 {
            return Some(0);
        }
        mul_div(self.principal, self.growth_factor(now)?, SCALE)
    }

    /// Fold pending interest into principal and restart the accrual clock.
    ///
    /// Returns the interest that was materialized. A `now` earlier than
    /// `last_accrual` accrues nothing and leaves the clock where it was.
    pub fn materialize(&mut self, now: Timestamp) -> Option<u128> {
        let accrued = self.accrued_balance(now)?;
        let delta = accrued - self.principal;
        self.principal = accrued;
        self.last_accrual = self.last_accrual.max(now);
        Some(delta)
    }
}
