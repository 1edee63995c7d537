//! Events emitted by ledger mutations.

use crate::auth::Role;
use rebase_types::AccountId;

/// Notifications observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// The global base rate was lowered.
    BaseRateChanged { previous: u128, rate: u128 },
    /// Principal was credited to an account at the given personal rate.
    Minted {
        account: AccountId,
        amount: u128,
        rate: u128,
    },
    /// Principal was debited from an account.
    Burned { account: AccountId, amount: u128 },
    /// Principal moved between two accounts.
    Transferred {
        from: AccountId,
        to: AccountId,
        amount: u128,
    },
    /// Pending interest was folded into an account's principal.
    InterestMaterialized { account: AccountId, amount: u128 },
    /// A recipient funded from empty took on the current base rate.
    RateAdopted { account: AccountId, rate: u128 },
    /// An allowance was set.
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: u128,
    },
    RoleGranted { account: AccountId, role: Role },
    RoleRevoked { account: AccountId, role: Role },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the mutating call; keep them fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
