//! Binary fixed-point encoding of reserve ratios for the price accumulators.

use ethnum::U256;

/// Encodes `numerator / denominator` as an unsigned fixed-point number with
/// `resolution_bits` fractional bits: `(numerator << bits) / denominator`.
///
/// With reserves capped below 2^112 and the default 112 fractional bits the
/// result always fits in 224 bits.
///
/// Returns [`None`] if `denominator` is zero or the shift overflows.
///
/// # Examples
///
/// ```
/// use ethnum::U256;
/// use xyk_amm::math::encode_ratio;
///
/// let two = encode_ratio(4, 2, 112);
/// assert_eq!(two, Some(U256::new(2) << 112));
/// ```
#[must_use]
pub fn encode_ratio(numerator: u128, denominator: u128, resolution_bits: u32) -> Option<U256> {
    if denominator == 0 || resolution_bits >= 256 {
        return None;
    }
    let n = U256::new(numerator);
    // a value of `w` significant bits shifted by `b` needs `w + b` bits
    let width = 256 - n.leading_zeros();
    if width + resolution_bits > 256 {
        return None;
    }
    Some((n << resolution_bits) / U256::new(denominator))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator() {
        assert_eq!(encode_ratio(1, 0, 112), None);
    }

    #[test]
    fn quarter_price() {
        let q = encode_ratio(1, 4, 112);
        assert_eq!(q, Some(U256::ONE << 110));
    }

    #[test]
    fn max_reserve_ratio_fits_in_224_bits() {
        let max = (1u128 << 112) - 1;
        let Some(p) = encode_ratio(max, 1, 112) else {
            panic!("max reserve ratio must encode");
        };
        assert!(p < U256::ONE << 224);
    }

    #[test]
    fn rejects_overflowing_shift() {
        assert_eq!(encode_ratio(u128::MAX, 1, 129), None);
        assert!(encode_ratio(u128::MAX, 1, 128).is_some());
    }
}
