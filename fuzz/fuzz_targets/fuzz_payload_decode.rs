#![no_main]

use libfuzzer_sys::fuzz_target;

use rebase_bridge::{decode_rate, encode_rate};

// Arbitrary bytes arriving as a rate payload must be rejected or decoded,
// never panic. Anything that decodes must re-encode to the same word.
fuzz_target!(|data: &[u8]| {
    if let Ok(rate) = decode_rate(data) {
        assert_eq!(encode_rate(rate), data);
    }
});
