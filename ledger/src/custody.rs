//! Reference custody wrapper: converts a base asset into ledger value and back
//! at the current base rate.

use crate::engine::AccrualLedger;
use crate::error::LedgerError;
use rebase_types::{AccountId, Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Holds the base-asset reserve backing deposits.
///
/// The vault's `account` must hold `Mint` and `Burn` on the ledger. Interest
/// paid out on withdrawal comes out of the same reserve, so the issuer tops
/// it up with [`Vault::fund_rewards`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vault {
    account: AccountId,
    reserve: u128,
}

impl Vault {
    pub fn new(account: AccountId) -> Self {
        Self { account, reserve: 0 }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn reserve(&self) -> u128 {
        self.reserve
    }

    /// Add base asset to the reserve without minting anything.
    pub fn fund_rewards(&mut self, value: u128) -> Result<(), LedgerError> {
        self.reserve = self.reserve.checked_add(value).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Take `value` of base asset from `holder` and credit the same amount of
    /// principal at the current base rate.
    pub fn deposit(
        &mut self,
        ledger: &mut AccrualLedger,
        holder: &AccountId,
        value: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let reserve = self.reserve.checked_add(value).ok_or(LedgerError::Overflow)?;
        let rate = ledger.current_base_rate();
        ledger.credit(&self.account, holder, value, rate, now)?;
        self.reserve = reserve;
        tracing::info!(holder = %holder, value, rate, "deposit");
        Ok(())
    }

    /// Debit `holder` and release the same amount of base asset.
    ///
    /// The reserve is checked against the accrued balance before any ledger
    /// state changes. Returns the amount released.
    pub fn withdraw(
        &mut self,
        ledger: &mut AccrualLedger,
        holder: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        let owed = amount.resolve(ledger.accrued_balance_checked(holder, now)?);
        if self.reserve < owed {
            return Err(LedgerError::InsufficientReserve {
                needed: owed,
                available: self.reserve,
            });
        }
        let released = ledger.debit(&self.account, holder, Amount::Exact(owed), now)?;
        self.reserve -= released;
        tracing::info!(holder = %holder, released, reserve = self.reserve, "withdrawal");
        Ok(released)
    }
}
