//! Transport-level request validation.

use crate::message::{LockOrBurnRequest, ReleaseOrMintRequest};
use rebase_types::{AccountId, DomainId, TokenId};
use std::collections::{HashMap, HashSet};

/// Validation hook the transport collaborator supplies.
///
/// Returning `Err(reason)` aborts the bridge operation before any ledger call.
pub trait TransferPolicy {
    fn validate_lock_or_burn(&self, request: &LockOrBurnRequest) -> Result<(), String>;
    fn validate_release_or_mint(&self, request: &ReleaseOrMintRequest) -> Result<(), String>;

    /// Token identifier the given remote domain expects, if it is known.
    fn remote_token(&self, domain: &DomainId) -> Option<TokenId>;
}

/// The counterpart of this adapter on another domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteDomain {
    /// Token identifier on the remote domain.
    pub token: TokenId,
    /// Adapter account on the remote domain that is allowed to send to us.
    pub adapter: AccountId,
}

/// Allow-list policy: known remote domains, a pause switch, and an optional
/// sender allow-list.
#[derive(Clone, Debug, Default)]
pub struct PoolPolicy {
    remotes: HashMap<DomainId, RemoteDomain>,
    paused: bool,
    /// `None` means every sender may bridge out.
    allowed_senders: Option<HashSet<AccountId>>,
}

impl PoolPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(mut self, domain: DomainId, remote: RemoteDomain) -> Self {
        self.remotes.insert(domain, remote);
        self
    }

    pub fn remote(&self, domain: &DomainId) -> Option<&RemoteDomain> {
        self.remotes.get(domain)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Restrict outbound transfers to the given senders.
    pub fn restrict_senders(&mut self, senders: impl IntoIterator<Item = AccountId>) {
        self.allowed_senders = Some(senders.into_iter().collect());
    }
}

impl TransferPolicy for PoolPolicy {
    fn validate_lock_or_burn(&self, request: &LockOrBurnRequest) -> Result<(), String> {
        if self.paused {
            return Err("adapter is paused".into());
        }
        if !self.remotes.contains_key(&request.remote_domain) {
            return Err(format!("unsupported remote domain {}", request.remote_domain));
        }
        if !request.receiver.is_valid() {
            return Err(format!("invalid receiver {:?}", request.receiver.as_str()));
        }
        if let Some(allowed) = &self.allowed_senders {
            if !allowed.contains(&request.original_sender) {
                return Err(format!("sender {} is not allow-listed", request.original_sender));
            }
        }
        Ok(())
    }

    fn validate_release_or_mint(&self, request: &ReleaseOrMintRequest) -> Result<(), String> {
        if self.paused {
            return Err("adapter is paused".into());
        }
        let Some(remote) = self.remotes.get(&request.source_domain) else {
            return Err(format!("unsupported source domain {}", request.source_domain));
        };
        if remote.adapter != request.source_adapter {
            return Err(format!(
                "unexpected source adapter {} for {}",
                request.source_adapter, request.source_domain
            ));
        }
        if !request.receiver.is_valid() {
            return Err(format!("invalid receiver {:?}", request.receiver.as_str()));
        }
        Ok(())
    }

    fn remote_token(&self, domain: &DomainId) -> Option<TokenId> {
        self.remotes.get(domain).map(|remote| remote.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PoolPolicy {
        PoolPolicy::new().with_remote(
            DomainId::new(2),
            RemoteDomain {
                token: TokenId::new("rbt-b"),
                adapter: AccountId::new("pool-b"),
            },
        )
    }

    fn outbound(receiver: &str) -> LockOrBurnRequest {
        LockOrBurnRequest {
            original_sender: AccountId::new("alice"),
            receiver: AccountId::new(receiver),
            remote_domain: DomainId::new(2),
            amount: 10,
        }
    }

    fn inbound(adapter: &str) -> ReleaseOrMintRequest {
        ReleaseOrMintRequest {
            source_domain: DomainId::new(2),
            source_adapter: AccountId::new(adapter),
            original_sender: AccountId::new("alice"),
            receiver: AccountId::new("bob"),
            amount: 10,
            source_pool_data: vec![0; 32],
        }
    }

    #[test]
    fn known_remote_passes() {
        let policy = policy();
        assert!(policy.validate_lock_or_burn(&outbound("bob")).is_ok());
        assert!(policy.validate_release_or_mint(&inbound("pool-b")).is_ok());
        assert_eq!(policy.remote_token(&DomainId::new(2)), Some(TokenId::new("rbt-b")));
        assert_eq!(policy.remote_token(&DomainId::new(3)), None);
    }

    #[test]
    fn blank_receiver_is_rejected() {
        assert!(policy().validate_lock_or_burn(&outbound("")).is_err());
        assert!(policy().validate_lock_or_burn(&outbound(" bob")).is_err());
    }

    #[test]
    fn impostor_source_adapter_is_rejected() {
        let err = policy().validate_release_or_mint(&inbound("mallory")).unwrap_err();
        assert!(err.contains("mallory"));
    }

    #[test]
    fn pause_blocks_both_directions() {
        let mut policy = policy();
        policy.set_paused(true);
        assert!(policy.is_paused());
        assert!(policy.validate_lock_or_burn(&outbound("bob")).is_err());
        assert!(policy.validate_release_or_mint(&inbound("pool-b")).is_err());
    }
}
