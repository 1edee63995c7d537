//! Core accrual engine.

use crate::account::Account;
use crate::auth::{Authority, Role};
use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};
use crate::rate::RateController;
use rebase_types::{AccountId, Amount, Timestamp};
use std::collections::HashMap;

/// One domain's ledger: account records, allowances, the global base rate
/// and the capability table.
///
/// Every mutating call stages its changes on copies of the affected records
/// and writes them back only after all checks pass, so a failed call leaves
/// principal, rate and accrual clock exactly as they were.
#[derive(Debug)]
pub struct AccrualLedger {
    pub(crate) accounts: HashMap<AccountId, Account>,
    pub(crate) allowances: HashMap<(AccountId, AccountId), u128>,
    pub(crate) rates: RateController,
    pub(crate) authority: Authority,
    pub(crate) events: EventBus,
}

impl AccrualLedger {
    /// Create an empty ledger owned by `owner` with the given starting base rate.
    pub fn new(owner: AccountId, initial_base_rate: u128) -> Self {
        Self {
            accounts: HashMap::new(),
            allowances: HashMap::new(),
            rates: RateController::new(initial_base_rate),
            authority: Authority::new(owner),
            events: EventBus::new(),
        }
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// The record for `account`, if it has ever been credited.
    pub fn account(&self, account: &AccountId) -> Option<&Account> {
        self.accounts.get(account)
    }

    /// All known accounts, in no particular order.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    pub fn principal_of(&self, account: &AccountId) -> u128 {
        self.accounts.get(account).map_or(0, |a| a.principal)
    }

    pub fn personal_rate_of(&self, account: &AccountId) -> u128 {
        self.accounts.get(account).map_or(0, |a| a.personal_rate)
    }

    pub fn last_accrual_of(&self, account: &AccountId) -> Timestamp {
        self.accounts
            .get(account)
            .map_or(Timestamp::EPOCH, |a| a.last_accrual)
    }

    /// Displayed balance: principal plus linear interest since the last
    /// materialization.
    pub fn accrued_balance_checked(
        &self,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        match self.accounts.get(account) {
            Some(record) => record.accrued_balance(now).ok_or(LedgerError::Overflow),
            None => Ok(0),
        }
    }

    /// Displayed balance, saturating at `u128::MAX` on overflow.
    pub fn accrued_balance(&self, account: &AccountId, now: Timestamp) -> u128 {
        self.accrued_balance_checked(account, now).unwrap_or(u128::MAX)
    }

    /// Sum of materialized principal over all accounts.
    pub fn total_principal(&self) -> u128 {
        self.accounts
            .values()
            .fold(0u128, |sum, a| sum.saturating_add(a.principal))
    }

    pub fn current_base_rate(&self) -> u128 {
        self.rates.current_base_rate()
    }

    pub fn rate_controller(&self) -> &RateController {
        &self.rates
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    // ── Observers ──────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Authorization ──────────────────────────────────────────────────

    pub fn grant_role(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        role: Role,
    ) -> Result<(), LedgerError> {
        if self.authority.grant(caller, account, role)? {
            tracing::info!(account = %account, %role, "role granted");
            self.events.emit(&LedgerEvent::RoleGranted {
                account: account.clone(),
                role,
            });
        }
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        role: Role,
    ) -> Result<(), LedgerError> {
        if self.authority.revoke(caller, account, role)? {
            tracing::info!(account = %account, %role, "role revoked");
            self.events.emit(&LedgerEvent::RoleRevoked {
                account: account.clone(),
                role,
            });
        }
        Ok(())
    }

    /// Grant both `Mint` and `Burn`, the pair every minter (bridge adapter,
    /// custody vault) needs.
    pub fn grant_mint_and_burn(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.grant_role(caller, account, Role::Mint)?;
        self.grant_role(caller, account, Role::Burn)
    }

    // ── Rate policy ────────────────────────────────────────────────────

    /// Lower the base rate offered to accounts funded from empty.
    pub fn set_base_rate(
        &mut self,
        caller: &AccountId,
        new_rate: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.authority.require(caller, Role::RateAdmin)?;
        let change = self.rates.set_base_rate(new_rate, now)?;
        tracing::info!(previous = change.previous, rate = change.rate, "base rate lowered");
        self.events.emit(&LedgerEvent::BaseRateChanged {
            previous: change.previous,
            rate: change.rate,
        });
        Ok(())
    }

    // ── Accrual ────────────────────────────────────────────────────────

    /// Fold pending interest for `account` into its principal.
    ///
    /// Value-preserving, so anyone may call it. Unknown accounts are left
    /// alone rather than created. Returns the interest materialized.
    pub fn materialize(
        &mut self,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        let Some(mut record) = self.accounts.get(account).cloned() else {
            return Ok(0);
        };
        let interest = record.materialize(now).ok_or(LedgerError::Overflow)?;
        self.accounts.insert(account.clone(), record);
        self.note_interest(account, interest);
        Ok(interest)
    }

    /// Credit `amount` of principal to `account` at personal rate `rate`.
    ///
    /// The rate is written before materializing, so interest pending since
    /// the last accrual is priced at `rate` rather than the previous rate.
    pub fn credit(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        amount: u128,
        rate: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.authority.require(caller, Role::Mint)?;

        let mut record = self.record(account);
        record.personal_rate = rate;
        let interest = record.materialize(now).ok_or(LedgerError::Overflow)?;
        record.principal = record
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.accounts.insert(account.clone(), record);
        self.note_interest(account, interest);
        tracing::debug!(account = %account, amount, rate, minter = %caller, "credited");
        self.events.emit(&LedgerEvent::Minted {
            account: account.clone(),
            amount,
            rate,
        });
        Ok(())
    }

    /// Debit principal from `account` after materializing its interest.
    ///
    /// `Amount::All` resolves to the materialized balance. Returns the amount
    /// actually debited.
    pub fn debit(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        self.authority.require(caller, Role::Burn)?;

        let Some(mut record) = self.accounts.get(account).cloned() else {
            let needed = amount.resolve(0);
            if needed == 0 {
                return Ok(0);
            }
            return Err(LedgerError::InsufficientBalance {
                needed,
                available: 0,
            });
        };
        let interest = record.materialize(now).ok_or(LedgerError::Overflow)?;
        let needed = amount.resolve(record.principal);
        if record.principal < needed {
            return Err(LedgerError::InsufficientBalance {
                needed,
                available: record.principal,
            });
        }
        record.principal -= needed;

        self.accounts.insert(account.clone(), record);
        self.note_interest(account, interest);
        tracing::debug!(account = %account, amount = needed, burner = %caller, "debited");
        self.events.emit(&LedgerEvent::Burned {
            account: account.clone(),
            amount: needed,
        });
        Ok(needed)
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Copy of the record for staging; a fresh default if never credited.
    pub(crate) fn record(&self, account: &AccountId) -> Account {
        self.accounts.get(account).cloned().unwrap_or_default()
    }

    pub(crate) fn note_interest(&self, account: &AccountId, interest: u128) {
        if interest == 0 {
            return;
        }
        tracing::trace!(account = %account, interest, "interest materialized");
        self.events.emit(&LedgerEvent::InterestMaterialized {
            account: account.clone(),
            amount: interest,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebase_types::SCALE;

    const RATE: u128 = 50_000_000_000; // 5e10 per second

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn make_ledger() -> AccrualLedger {
        let mut ledger = AccrualLedger::new(id("owner"), RATE);
        ledger.grant_mint_and_burn(&id("owner"), &id("minter")).unwrap();
        ledger
    }

    #[test]
    fn unknown_account_has_zero_everything() {
        let ledger = make_ledger();
        assert_eq!(ledger.accrued_balance(&id("nobody"), ts(1_000)), 0);
        assert_eq!(ledger.principal_of(&id("nobody")), 0);
        assert_eq!(ledger.personal_rate_of(&id("nobody")), 0);
        assert_eq!(ledger.last_accrual_of(&id("nobody")), Timestamp::EPOCH);
    }

    #[test]
    fn credit_sets_rate_clock_and_principal() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 100_000, RATE, ts(10)).unwrap();

        let a = ledger.account(&id("alice")).unwrap();
        assert_eq!(a.principal, 100_000);
        assert_eq!(a.personal_rate, RATE);
        assert_eq!(a.last_accrual, ts(10));
        assert_eq!(ledger.accrued_balance(&id("alice"), ts(10)), 100_000);
        assert_eq!(ledger.accrued_balance(&id("alice"), ts(3_610)), 100_018);
    }

    #[test]
    fn credit_requires_mint_role() {
        let mut ledger = make_ledger();
        let err = ledger
            .credit(&id("mallory"), &id("mallory"), 1, RATE, ts(0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { role: Role::Mint, .. }));
        assert!(ledger.account(&id("mallory")).is_none());
    }

    #[test]
    fn credit_overwrites_rate_before_materializing() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 1_000 * SCALE, SCALE / 1_000, ts(0)).unwrap();
        // 100 seconds later, credit again at a rate ten times lower.
        ledger.credit(&id("minter"), &id("alice"), 0, SCALE / 10_000, ts(100)).unwrap();

        // The whole 100s window is priced at the *new* rate: 1000 * (1 + 0.0001 * 100) = 1010.
        assert_eq!(ledger.principal_of(&id("alice")), 1_010 * SCALE);
        assert_eq!(ledger.personal_rate_of(&id("alice")), SCALE / 10_000);
    }

    #[test]
    fn materialize_folds_interest_and_is_idempotent() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 100_000, RATE, ts(0)).unwrap();

        assert_eq!(ledger.materialize(&id("alice"), ts(3_600)).unwrap(), 18);
        assert_eq!(ledger.principal_of(&id("alice")), 100_018);
        assert_eq!(ledger.materialize(&id("alice"), ts(3_600)).unwrap(), 0);
        assert_eq!(ledger.principal_of(&id("alice")), 100_018);
        assert_eq!(ledger.last_accrual_of(&id("alice")), ts(3_600));
    }

    #[test]
    fn materialize_does_not_create_accounts() {
        let mut ledger = make_ledger();
        assert_eq!(ledger.materialize(&id("ghost"), ts(5)).unwrap(), 0);
        assert!(ledger.account(&id("ghost")).is_none());
    }

    #[test]
    fn debit_materializes_then_subtracts() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 100_000, RATE, ts(0)).unwrap();
        let burned = ledger
            .debit(&id("minter"), &id("alice"), Amount::Exact(100_010), ts(3_600))
            .unwrap();
        assert_eq!(burned, 100_010);
        assert_eq!(ledger.principal_of(&id("alice")), 8);
    }

    #[test]
    fn debit_all_empties_account() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 100_000, RATE, ts(0)).unwrap();
        let burned = ledger.debit(&id("minter"), &id("alice"), Amount::All, ts(3_600)).unwrap();
        assert_eq!(burned, 100_018);
        assert_eq!(ledger.principal_of(&id("alice")), 0);
        assert_eq!(ledger.accrued_balance(&id("alice"), ts(1_000_000)), 0);
    }

    #[test]
    fn overdraw_fails_without_touching_state() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 100_000, RATE, ts(0)).unwrap();
        let before = ledger.account(&id("alice")).cloned().unwrap();

        let err = ledger
            .debit(&id("minter"), &id("alice"), Amount::Exact(200_000), ts(3_600))
            .unwrap_err();
        match err {
            LedgerError::InsufficientBalance { needed, available } => {
                assert_eq!(needed, 200_000);
                assert_eq!(available, 100_018);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
        assert_eq!(ledger.account(&id("alice")), Some(&before));
    }

    #[test]
    fn debit_requires_burn_role() {
        let mut ledger = make_ledger();
        ledger.credit(&id("minter"), &id("alice"), 10, RATE, ts(0)).unwrap();
        let err = ledger
            .debit(&id("alice"), &id("alice"), Amount::Exact(1), ts(0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { role: Role::Burn, .. }));
        assert_eq!(ledger.principal_of(&id("alice")), 10);
    }

    #[test]
    fn base_rate_only_moves_down() {
        let mut ledger = make_ledger();
        assert!(ledger.set_base_rate(&id("owner"), RATE, ts(0)).is_err());
        assert!(ledger.set_base_rate(&id("owner"), RATE + 1, ts(0)).is_err());
        ledger.set_base_rate(&id("owner"), RATE / 2, ts(0)).unwrap();
        assert_eq!(ledger.current_base_rate(), RATE / 2);
    }

    #[test]
    fn base_rate_change_requires_admin() {
        let mut ledger = make_ledger();
        let err = ledger.set_base_rate(&id("minter"), 1, ts(0)).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { role: Role::RateAdmin, .. }));
        assert_eq!(ledger.current_base_rate(), RATE);
    }

    #[test]
    fn only_owner_grants_minters() {
        let mut ledger = make_ledger();
        assert!(ledger
            .grant_mint_and_burn(&id("minter"), &id("mallory"))
            .is_err());
        assert!(!ledger.authority().has_role(&id("mallory"), Role::Mint));
    }
}
