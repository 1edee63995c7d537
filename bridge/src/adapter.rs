//! The bridge adapter: one per domain, holding mint/burn capability on that
//! domain's ledger.

use crate::error::BridgeError;
use crate::message::{
    CrossDomainMessage, LockOrBurnRequest, LockOrBurnResult, ReleaseOrMintRequest,
    ReleaseOrMintResult,
};
use crate::payload::{decode_rate, encode_rate};
use crate::policy::{PoolPolicy, TransferPolicy};
use rebase_ledger::{AccrualLedger, LedgerError, Role};
use rebase_types::{AccountId, Amount, DomainId, TokenId, Timestamp};

/// Moves value and its rate entitlement between domains.
///
/// The two sides never share state: the send side produces a
/// [`CrossDomainMessage`], and the receive side on another domain's adapter
/// replays it against its own ledger.
#[derive(Debug)]
pub struct BridgeAdapter<P = PoolPolicy> {
    domain: DomainId,
    account: AccountId,
    token: TokenId,
    policy: P,
}

impl<P: TransferPolicy> BridgeAdapter<P> {
    /// `account` is the adapter's own ledger account; it must hold `Mint`
    /// and `Burn` on the local ledger.
    pub fn new(domain: DomainId, account: AccountId, token: TokenId, policy: P) -> Self {
        Self {
            domain,
            account,
            token,
            policy,
        }
    }

    pub fn domain(&self) -> DomainId {
        self.domain
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn token(&self) -> &TokenId {
        &self.token
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Send side: capture the sender's personal rate and burn the value the
    /// transport already placed in the adapter's account.
    pub fn lock_or_burn(
        &self,
        ledger: &mut AccrualLedger,
        request: &LockOrBurnRequest,
        now: Timestamp,
    ) -> Result<LockOrBurnResult, BridgeError> {
        self.policy
            .validate_lock_or_burn(request)
            .map_err(|reason| self.rejected("lock_or_burn", reason))?;
        let dest_token = self.dest_token("lock_or_burn", request.remote_domain)?;
        self.burn_and_encode(ledger, request, dest_token, now)
    }

    /// Receive side: decode the sender's rate and mint at exactly that rate.
    pub fn release_or_mint(
        &self,
        ledger: &mut AccrualLedger,
        request: &ReleaseOrMintRequest,
        now: Timestamp,
    ) -> Result<ReleaseOrMintResult, BridgeError> {
        self.policy
            .validate_release_or_mint(request)
            .map_err(|reason| self.rejected("release_or_mint", reason))?;
        let rate = decode_rate(&request.source_pool_data)?;

        ledger.credit(&self.account, &request.receiver, request.amount, rate, now)?;

        tracing::info!(
            domain = %self.domain,
            source = %request.source_domain,
            receiver = %request.receiver,
            amount = request.amount,
            rate,
            "released and minted from remote domain"
        );
        Ok(ReleaseOrMintResult {
            destination_amount: request.amount,
        })
    }

    /// Full outbound flow for a holder: move the value into adapter custody,
    /// burn it, and build the envelope for the transport.
    ///
    /// Amount, policy, destination token and capability are all checked
    /// before the custody move, so a rejected request leaves the holder's
    /// balance untouched.
    pub fn send(
        &self,
        ledger: &mut AccrualLedger,
        sender: &AccountId,
        receiver: &AccountId,
        remote_domain: DomainId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<CrossDomainMessage, BridgeError> {
        let balance = ledger.accrued_balance_checked(sender, now)?;
        let amount = amount.resolve(balance);
        if amount == 0 {
            return Err(LedgerError::InsufficientBalance {
                needed: 1,
                available: balance,
            }
            .into());
        }
        let request = LockOrBurnRequest {
            original_sender: sender.clone(),
            receiver: receiver.clone(),
            remote_domain,
            amount,
        };
        self.policy
            .validate_lock_or_burn(&request)
            .map_err(|reason| self.rejected("send", reason))?;
        let dest_token = self.dest_token("send", remote_domain)?;
        ledger.authority().require(&self.account, Role::Burn)?;

        ledger.transfer(sender, &self.account, Amount::Exact(amount), now)?;
        let result = self.burn_and_encode(ledger, &request, dest_token, now)?;

        Ok(CrossDomainMessage {
            source_domain: self.domain,
            dest_domain: remote_domain,
            source_adapter: self.account.clone(),
            original_sender: sender.clone(),
            receiver: receiver.clone(),
            amount,
            dest_token: result.dest_token,
            payload: result.dest_pool_data,
        })
    }

    /// Full inbound flow for an envelope addressed to this adapter.
    pub fn receive(
        &self,
        ledger: &mut AccrualLedger,
        message: &CrossDomainMessage,
        now: Timestamp,
    ) -> Result<ReleaseOrMintResult, BridgeError> {
        if message.dest_domain != self.domain {
            return Err(self.rejected(
                "receive",
                format!(
                    "message addressed to {}, this is {}",
                    message.dest_domain, self.domain
                ),
            ));
        }
        if message.dest_token != self.token {
            return Err(self.rejected(
                "receive",
                format!(
                    "message for token {}, this adapter serves {}",
                    message.dest_token, self.token
                ),
            ));
        }
        self.release_or_mint(ledger, &message.to_release_request(), now)
    }

    fn dest_token(&self, operation: &str, remote: DomainId) -> Result<TokenId, BridgeError> {
        self.policy
            .remote_token(&remote)
            .ok_or_else(|| self.rejected(operation, format!("no token configured for {remote}")))
    }

    fn burn_and_encode(
        &self,
        ledger: &mut AccrualLedger,
        request: &LockOrBurnRequest,
        dest_token: TokenId,
        now: Timestamp,
    ) -> Result<LockOrBurnResult, BridgeError> {
        let rate = ledger.personal_rate_of(&request.original_sender);
        ledger.debit(&self.account, &self.account, Amount::Exact(request.amount), now)?;

        tracing::info!(
            domain = %self.domain,
            remote = %request.remote_domain,
            sender = %request.original_sender,
            amount = request.amount,
            rate,
            "locked and burned for remote domain"
        );
        Ok(LockOrBurnResult {
            dest_token,
            dest_pool_data: encode_rate(rate),
        })
    }

    fn rejected(&self, operation: &str, reason: String) -> BridgeError {
        tracing::warn!(domain = %self.domain, operation, %reason, "bridge request rejected");
        BridgeError::ValidationFailed(reason)
    }
}
