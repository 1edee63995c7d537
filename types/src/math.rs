//! Fixed-point helpers for interest accrual.
//!
//! Rates are unsigned fixed-point values with 18 decimals: `1.0 == SCALE`.
//! Products of a balance and a growth factor routinely exceed `u128`
//! (a 10^24 balance times a 10^18-scaled factor), so `mul_div` carries a
//! 256-bit intermediate and only fails when the *quotient* does not fit.

use primitive_types::U256;

/// Fixed-point scale: `10^18` represents `1.0`.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// `floor(a * b / divisor)` with a 256-bit intermediate.
///
/// Returns `None` when `divisor` is zero or the quotient exceeds `u128::MAX`.
pub fn mul_div(a: u128, b: u128, divisor: u128) -> Option<u128> {
    let quotient = U256::from(a)
        .checked_mul(U256::from(b))?
        .checked_div(U256::from(divisor))?;
    if quotient > U256::from(u128::MAX) {
        return None;
    }
    Some(quotient.as_u128())
}
