//! Timestamp type and clock abstraction.
//!
//! Timestamps are Unix epoch seconds (UTC). Interest accrues per whole second,
//! so sub-second precision is never needed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero). Also the "never accrued" marker for fresh accounts.
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    ///
    /// Saturates to zero when `now` precedes `self`, so accrual over a clock
    /// that briefly runs backwards is simply zero rather than undefined.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of "now" for components that are not handed a timestamp explicitly.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

