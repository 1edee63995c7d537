#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rebase_ledger::Account;
use rebase_types::Timestamp;

#[derive(Debug, Arbitrary)]
struct Input {
    principal: u128,
    rate: u128,
    last_accrual: u64,
    now: u64,
}

// Accrual over the full input range either overflows cleanly or yields a
// balance no smaller than principal; materializing then agrees with it.
fuzz_target!(|input: Input| {
    let mut account = Account {
        principal: input.principal,
        personal_rate: input.rate,
        last_accrual: Timestamp::new(input.last_accrual),
    };
    let now = Timestamp::new(input.now);

    let Some(balance) = account.accrued_balance(now) else {
        return;
    };
    assert!(balance >= input.principal);
    assert!(account.materialize(now).is_some());
    assert_eq!(account.principal, balance);
});
