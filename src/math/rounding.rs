//! Division helpers with an explicit rounding direction.
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Swap output, minted shares, burned amounts | [`Rounding::Down`] |
//! | Required swap input | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use xyk_amm::domain::Rounding;
//! use xyk_amm::math::div_round;
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use ethnum::U256;

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        // q + 1 cannot overflow: a nonzero remainder means q < u128::MAX
        Rounding::Up if numerator % denominator != 0 => Some(q + 1),
        Rounding::Up => Some(q),
    }
}

/// Computes `a × b / denominator` in 256-bit arithmetic.
///
/// Returns [`None`] if `denominator` is zero or `a × b` overflows 256 bits.
///
/// ```
/// use ethnum::U256;
/// use xyk_amm::domain::Rounding;
/// use xyk_amm::math::mul_div;
///
/// let big = U256::new(10u128.pow(30));
/// assert_eq!(mul_div(big, big, big, Rounding::Down), Some(big));
/// ```
#[must_use]
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator == U256::ZERO {
        return None;
    }
    let product = a.checked_mul(b)?;
    let q = product / denominator;
    match rounding {
        Rounding::Down => Some(q),
        Rounding::Up if product % denominator != U256::ZERO => q.checked_add(U256::ONE),
        Rounding::Up => Some(q),
    }
}
