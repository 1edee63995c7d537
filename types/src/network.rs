//! Domain identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an independent execution domain ("chain").
///
/// Each domain runs its own ledger instance. The numeric selector is what the
/// transport uses to route messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainId(u64);

impl DomainId {
    pub const fn new(selector: u64) -> Self {
        Self(selector)
    }

    pub fn selector(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain-{}", self.0)
    }
}
