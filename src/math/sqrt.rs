//! Integer square root.

use ethnum::U256;

/// Floor of the square root of a 256-bit integer, via Newton's method.
///
/// Used for the first-deposit share count (`√(amount0 × amount1)`) and for
/// the protocol-fee comparison of `√k` against `√k_last`.
///
/// # Examples
///
/// ```
/// use ethnum::U256;
/// use xyk_amm::math::isqrt;
///
/// assert_eq!(isqrt(U256::new(16)), U256::new(4));
/// assert_eq!(isqrt(U256::new(17)), U256::new(4));
/// assert_eq!(isqrt(U256::ZERO), U256::ZERO);
/// ```
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n < U256::new(4) {
        return if n == U256::ZERO { U256::ZERO } else { U256::ONE };
    }
    // n / 2 + 1 avoids the overflow that (n + 1) / 2 hits at U256::MAX
    let mut x = n;
    let two = U256::new(2);
    let mut y = n / two + U256::ONE;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    x
}
