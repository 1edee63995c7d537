#![no_main]

use libfuzzer_sys::fuzz_target;

use rebase_bridge::CrossDomainMessage;
use rebase_ledger::Account;

// Malformed envelopes and snapshot records must fail to parse cleanly.
fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<CrossDomainMessage>(data);
    let _ = bincode::deserialize::<CrossDomainMessage>(data);
    let _ = bincode::deserialize::<Account>(data);
});
