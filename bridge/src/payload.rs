//! Rate payload codec.
//!
//! The personal rate travels as a single 32-byte big-endian word, the same
//! layout a 256-bit ABI-encoded integer has. Rates are `u128` on this side,
//! so the upper 16 bytes of a well-formed word are always zero; a word that
//! does not fit is rejected instead of being truncated.

use crate::error::BridgeError;

/// Encoded length of one rate word.
pub const RATE_WORD_LEN: usize = 32;

/// Encode a personal rate for the destination domain.
pub fn encode_rate(rate: u128) -> Vec<u8> {
    let mut word = vec![0u8; RATE_WORD_LEN];
    word[RATE_WORD_LEN - 16..].copy_from_slice(&rate.to_be_bytes());
    word
}

/// Decode a personal rate produced by [`encode_rate`] (or any 256-bit
/// big-endian word whose value fits in `u128`).
pub fn decode_rate(data: &[u8]) -> Result<u128, BridgeError> {
    if data.len() != RATE_WORD_LEN {
        return Err(BridgeError::PayloadDecode(format!(
            "expected {RATE_WORD_LEN} bytes, got {}",
            data.len()
        )));
    }
    let (high, low) = data.split_at(RATE_WORD_LEN - 16);
    if high.iter().any(|b| *b != 0) {
        return Err(BridgeError::PayloadDecode(format!(
            "rate exceeds 128 bits: 0x{}",
            hex::encode(data)
        )));
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(low);
    Ok(u128::from_be_bytes(bytes))
}
