//! Request, result and envelope types exchanged with the transport.

use rebase_types::{AccountId, DomainId, TokenId};
use serde::{Deserialize, Serialize};

/// Outbound request. The transport has already moved `amount` into the
/// adapter's own account when this reaches the adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOrBurnRequest {
    pub original_sender: AccountId,
    /// Recipient on the remote domain.
    pub receiver: AccountId,
    pub remote_domain: DomainId,
    pub amount: u128,
}

/// What the send side hands back to the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOrBurnResult {
    pub dest_token: TokenId,
    /// Encoded personal rate of the original sender.
    pub dest_pool_data: Vec<u8>,
}

/// Inbound delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOrMintRequest {
    pub source_domain: DomainId,
    pub source_adapter: AccountId,
    pub original_sender: AccountId,
    pub receiver: AccountId,
    pub amount: u128,
    pub source_pool_data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOrMintResult {
    /// Always the delivered amount; no destination-side fee is taken.
    pub destination_amount: u128,
}

/// Everything the transport carries from one domain to another for a single
/// transfer. There is no idempotency key: delivering the same envelope twice
/// mints twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossDomainMessage {
    pub source_domain: DomainId,
    pub dest_domain: DomainId,
    pub source_adapter: AccountId,
    pub original_sender: AccountId,
    pub receiver: AccountId,
    pub amount: u128,
    pub dest_token: TokenId,
    pub payload: Vec<u8>,
}

impl CrossDomainMessage {
    /// The receive-side request this envelope turns into.
    pub fn to_release_request(&self) -> ReleaseOrMintRequest {
        ReleaseOrMintRequest {
            source_domain: self.source_domain,
            source_adapter: self.source_adapter.clone(),
            original_sender: self.original_sender.clone(),
            receiver: self.receiver.clone(),
            amount: self.amount,
            source_pool_data: self.payload.clone(),
        }
    }
}
