//! Transfer gate: holder-to-holder movement and the minter entry points.
//!
//! Every path materializes interest for the accounts involved before touching
//! principal, and decides whether the recipient keeps its personal rate.

use crate::account::Account;
use crate::engine::AccrualLedger;
use crate::error::LedgerError;
use crate::event::LedgerEvent;
use rebase_types::{AccountId, Amount, Timestamp};

/// Allowance value that is never decremented.
pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

/// Staged outcome of a transfer, committed only once every check passed.
struct TransferPlan {
    amount: u128,
    from: Account,
    from_interest: u128,
    /// `None` for a self-transfer.
    to: Option<StagedRecipient>,
}

struct StagedRecipient {
    record: Account,
    interest: u128,
    adopted_rate: Option<u128>,
}

impl AccrualLedger {
    /// Move value from `from` to `to` on behalf of `from`.
    ///
    /// Returns the amount moved (the resolved value of `Amount::All`).
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        let plan = self.plan_transfer(from, to, amount, now)?;
        Ok(self.commit_transfer(from, to, plan))
    }

    /// Move value from `from` to `to` on behalf of `spender`, consuming
    /// `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        let plan = self.plan_transfer(from, to, amount, now)?;
        let key = (from.clone(), spender.clone());
        let approved = self.allowances.get(&key).copied().unwrap_or(0);
        if approved < plan.amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: plan.amount,
                available: approved,
            });
        }
        if approved != UNLIMITED_ALLOWANCE {
            self.allowances.insert(key, approved - plan.amount);
        }
        Ok(self.commit_transfer(from, to, plan))
    }

    /// Let `spender` move up to `amount` of `owner`'s balance.
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: u128) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
        tracing::debug!(owner = %owner, spender = %spender, amount, "allowance set");
        self.events.emit(&LedgerEvent::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Minter entry point. The requested `rate` is applied verbatim; this is
    /// how a bridge reproduces a sender's rate on the destination.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
        rate: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.credit(caller, to, amount, rate, now)
    }

    /// Burner entry point.
    pub fn burn(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<u128, LedgerError> {
        self.debit(caller, from, amount, now)
    }

    fn plan_transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        requested: Amount,
        now: Timestamp,
    ) -> Result<TransferPlan, LedgerError> {
        let mut from_record = self.record(from);
        let from_interest = from_record
            .materialize(now)
            .ok_or(LedgerError::Overflow)?;

        let amount = requested.resolve(from_record.principal);
        if amount == 0 {
            return Err(LedgerError::InsufficientBalance {
                needed: 1,
                available: from_record.principal,
            });
        }
        if from_record.principal < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: from_record.principal,
            });
        }

        if from == to {
            return Ok(TransferPlan {
                amount,
                from: from_record,
                from_interest,
                to: None,
            });
        }

        let mut to_record = self.record(to);
        let to_interest = to_record.materialize(now).ok_or(LedgerError::Overflow)?;

        // A holder keeps its rate for as long as it holds anything; an empty
        // recipient re-enters at the current base rate.
        let adopted_rate = if to_record.principal == 0 {
            let rate = self.rates.current_base_rate();
            to_record.personal_rate = rate;
            Some(rate)
        } else {
            None
        };

        from_record.principal -= amount;
        to_record.principal = to_record
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        Ok(TransferPlan {
            amount,
            from: from_record,
            from_interest,
            to: Some(StagedRecipient {
                record: to_record,
                interest: to_interest,
                adopted_rate,
            }),
        })
    }

    fn commit_transfer(&mut self, from: &AccountId, to: &AccountId, plan: TransferPlan) -> u128 {
        let TransferPlan {
            amount,
            from: from_record,
            from_interest,
            to: recipient,
        } = plan;

        self.accounts.insert(from.clone(), from_record);
        self.note_interest(from, from_interest);

        if let Some(recipient) = recipient {
            self.accounts.insert(to.clone(), recipient.record);
            self.note_interest(to, recipient.interest);
            if let Some(rate) = recipient.adopted_rate {
                self.events.emit(&LedgerEvent::RateAdopted {
                    account: to.clone(),
                    rate,
                });
            }
        }

        tracing::debug!(from = %from, to = %to, amount, "transferred");
        self.events.emit(&LedgerEvent::Transferred {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebase_types::SCALE;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const HIGH: u128 = 50_000_000_000;
    const LOW: u128 = 40_000_000_000;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn funded_ledger() -> AccrualLedger {
        let mut ledger = AccrualLedger::new(id("owner"), HIGH);
        ledger.grant_mint_and_burn(&id("owner"), &id("vault")).unwrap();
        ledger.credit(&id("vault"), &id("alice"), 100_000, HIGH, ts(0)).unwrap();
        ledger
    }

    #[test]
    fn transfer_into_empty_account_adopts_base_rate() {
        let mut ledger = funded_ledger();
        ledger.set_base_rate(&id("owner"), LOW, ts(0)).unwrap();

        ledger.transfer(&id("alice"), &id("bob"), Amount::Exact(50_000), ts(0)).unwrap();

        assert_eq!(ledger.personal_rate_of(&id("bob")), LOW);
        assert_eq!(ledger.personal_rate_of(&id("alice")), HIGH);
        assert_eq!(ledger.last_accrual_of(&id("bob")), ts(0));
    }

    #[test]
    fn transfer_into_funded_account_keeps_grandfathered_rate() {
        let mut ledger = funded_ledger();
        ledger.credit(&id("vault"), &id("bob"), 10, HIGH, ts(0)).unwrap();
        ledger.set_base_rate(&id("owner"), LOW, ts(0)).unwrap();

        ledger.transfer(&id("alice"), &id("bob"), Amount::Exact(1_000), ts(10)).unwrap();
        assert_eq!(ledger.personal_rate_of(&id("bob")), HIGH);
    }

    #[test]
    fn transfer_materializes_both_sides() {
        let mut ledger = funded_ledger();
        ledger.credit(&id("vault"), &id("bob"), 100_000, HIGH, ts(0)).unwrap();

        ledger.transfer(&id("alice"), &id("bob"), Amount::Exact(18), ts(3_600)).unwrap();
        assert_eq!(ledger.principal_of(&id("alice")), 100_000);
        assert_eq!(ledger.principal_of(&id("bob")), 100_036);
        assert_eq!(ledger.last_accrual_of(&id("alice")), ts(3_600));
        assert_eq!(ledger.last_accrual_of(&id("bob")), ts(3_600));
    }

    #[test]
    fn transfer_all_moves_accrued_balance() {
        let mut ledger = funded_ledger();
        let moved = ledger.transfer(&id("alice"), &id("bob"), Amount::All, ts(3_600)).unwrap();
        assert_eq!(moved, 100_018);
        assert_eq!(ledger.principal_of(&id("alice")), 0);
        assert_eq!(ledger.principal_of(&id("bob")), 100_018);
    }

    #[test]
    fn transfer_all_from_empty_fails() {
        let mut ledger = funded_ledger();
        let err = ledger.transfer(&id("carol"), &id("bob"), Amount::All, ts(0)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { available: 0, .. }));
        assert!(ledger.account(&id("bob")).is_none());
        assert!(ledger.account(&id("carol")).is_none());
    }

    #[test]
    fn zero_transfer_is_rejected_without_events() {
        let mut ledger = funded_ledger();
        ledger.credit(&id("vault"), &id("bob"), 10, HIGH, ts(0)).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        ledger.subscribe(Box::new(move |_: &LedgerEvent| {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
        let alice = ledger.account(&id("alice")).cloned();
        let bob = ledger.account(&id("bob")).cloned();

        let err = ledger
            .transfer(&id("alice"), &id("bob"), Amount::Exact(0), ts(3_600))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance { needed: 1, available: 100_018 }
        ));
        assert_eq!(ledger.account(&id("alice")).cloned(), alice);
        assert_eq!(ledger.account(&id("bob")).cloned(), bob);
        assert_eq!(seen.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn transfer_from_unknown_account_creates_no_records() {
        let mut ledger = funded_ledger();
        let err = ledger
            .transfer(&id("carol"), &id("dave"), Amount::Exact(0), ts(0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { needed: 1, available: 0 }));
        let err = ledger
            .transfer(&id("carol"), &id("dave"), Amount::Exact(5), ts(0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { needed: 5, available: 0 }));
        assert!(ledger.account(&id("carol")).is_none());
        assert!(ledger.account(&id("dave")).is_none());
    }

    #[test]
    fn overdrawn_transfer_leaves_no_trace() {
        let mut ledger = funded_ledger();
        let before = ledger.account(&id("alice")).cloned();
        let err = ledger
            .transfer(&id("alice"), &id("bob"), Amount::Exact(200_000), ts(3_600))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance { needed: 200_000, available: 100_018 }
        ));
        assert_eq!(ledger.account(&id("alice")).cloned(), before);
        assert!(ledger.account(&id("bob")).is_none());
    }

    #[test]
    fn self_transfer_only_materializes() {
        let mut ledger = funded_ledger();
        ledger.set_base_rate(&id("owner"), LOW, ts(0)).unwrap();
        ledger.transfer(&id("alice"), &id("alice"), Amount::Exact(5), ts(3_600)).unwrap();
        assert_eq!(ledger.principal_of(&id("alice")), 100_018);
        assert_eq!(ledger.personal_rate_of(&id("alice")), HIGH);
    }

    #[test]
    fn transfers_conserve_principal() {
        let mut ledger = funded_ledger();
        ledger.credit(&id("vault"), &id("bob"), 5 * SCALE, HIGH, ts(0)).unwrap();
        let now = ts(0);
        let total = ledger.total_principal();
        ledger.transfer(&id("alice"), &id("bob"), Amount::Exact(7), now).unwrap();
        ledger.transfer(&id("bob"), &id("carol"), Amount::Exact(SCALE), now).unwrap();
        ledger.transfer(&id("carol"), &id("alice"), Amount::All, now).unwrap();
        assert_eq!(ledger.total_principal(), total);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut ledger = funded_ledger();
        ledger.approve(&id("alice"), &id("dex"), 1_000);
        ledger
            .transfer_from(&id("dex"), &id("alice"), &id("bob"), Amount::Exact(400), ts(0))
            .unwrap();
        assert_eq!(ledger.allowance(&id("alice"), &id("dex")), 600);
        assert_eq!(ledger.principal_of(&id("bob")), 400);
    }

    #[test]
    fn transfer_from_beyond_allowance_fails_cleanly() {
        let mut ledger = funded_ledger();
        ledger.approve(&id("alice"), &id("dex"), 10);
        let err = ledger
            .transfer_from(&id("dex"), &id("alice"), &id("bob"), Amount::All, ts(3_600))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientAllowance { needed: 100_018, available: 10 }
        ));
        assert_eq!(ledger.principal_of(&id("alice")), 100_000);
        assert_eq!(ledger.last_accrual_of(&id("alice")), ts(0));
        assert_eq!(ledger.allowance(&id("alice"), &id("dex")), 10);
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let mut ledger = funded_ledger();
        ledger.approve(&id("alice"), &id("dex"), UNLIMITED_ALLOWANCE);
        ledger
            .transfer_from(&id("dex"), &id("alice"), &id("bob"), Amount::Exact(1), ts(0))
            .unwrap();
        assert_eq!(ledger.allowance(&id("alice"), &id("dex")), UNLIMITED_ALLOWANCE);
    }

    #[test]
    fn mint_applies_requested_rate_verbatim() {
        let mut ledger = funded_ledger();
        ledger.set_base_rate(&id("owner"), LOW, ts(0)).unwrap();
        ledger.mint(&id("vault"), &id("bob"), 1, HIGH, ts(0)).unwrap();
        assert_eq!(ledger.personal_rate_of(&id("bob")), HIGH);
    }
}
