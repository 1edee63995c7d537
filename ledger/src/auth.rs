//! Capability grants for mutating entry points.

use crate::error::LedgerError;
use rebase_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A capability a caller must hold to reach a mutating entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May call `credit` / `mint`.
    Mint,
    /// May call `debit` / `burn`.
    Burn,
    /// May lower the global base rate.
    RateAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mint => "mint",
            Self::Burn => "burn",
            Self::RateAdmin => "rate-admin",
        };
        f.write_str(name)
    }
}

/// Who may do what on one ledger instance.
///
/// The owner implicitly holds `RateAdmin` and is the only account allowed to
/// grant or revoke roles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Authority {
    owner: AccountId,
    grants: HashMap<AccountId, BTreeSet<Role>>,
}

impl Authority {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            grants: HashMap::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn has_role(&self, account: &AccountId, role: Role) -> bool {
        if role == Role::RateAdmin && *account == self.owner {
            return true;
        }
        self.grants
            .get(account)
            .is_some_and(|roles| roles.contains(&role))
    }

    /// Fail with `Unauthorized` unless `caller` holds `role`.
    pub fn require(&self, caller: &AccountId, role: Role) -> Result<(), LedgerError> {
        if self.has_role(caller, role) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                role,
            })
        }
    }

    /// Grant `role` to `account`. Returns false if it was already held.
    pub fn grant(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        role: Role,
    ) -> Result<bool, LedgerError> {
        self.require_owner(caller, role)?;
        Ok(self.grants.entry(account.clone()).or_default().insert(role))
    }

    /// Revoke `role` from `account`. Returns false if it was not held.
    pub fn revoke(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        role: Role,
    ) -> Result<bool, LedgerError> {
        self.require_owner(caller, role)?;
        let removed = match self.grants.get_mut(account) {
            Some(roles) => roles.remove(&role),
            None => false,
        };
        if self.grants.get(account).is_some_and(BTreeSet::is_empty) {
            self.grants.remove(account);
        }
        Ok(removed)
    }

    fn require_owner(&self, caller: &AccountId, role: Role) -> Result<(), LedgerError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    #[test]
    fn owner_is_rate_admin_but_not_minter() {
        let auth = Authority::new(id("owner"));
        assert!(auth.has_role(&id("owner"), Role::RateAdmin));
        assert!(!auth.has_role(&id("owner"), Role::Mint));
    }

    #[test]
    fn grant_and_revoke_round_trip() {
        let mut auth = Authority::new(id("owner"));
        assert!(auth.grant(&id("owner"), &id("pool"), Role::Mint).unwrap());
        assert!(!auth.grant(&id("owner"), &id("pool"), Role::Mint).unwrap());
        assert!(auth.require(&id("pool"), Role::Mint).is_ok());
        assert!(auth.revoke(&id("owner"), &id("pool"), Role::Mint).unwrap());
        assert!(auth.require(&id("pool"), Role::Mint).is_err());
    }

    #[test]
    fn only_owner_can_grant() {
        let mut auth = Authority::new(id("owner"));
        let err = auth.grant(&id("mallory"), &id("mallory"), Role::Mint).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert!(!auth.has_role(&id("mallory"), Role::Mint));
    }
}
