//! Closed-form constant-product quotes.
//!
//! Both functions price against reserves only; they never touch a pool.
//! With `D = 10 000` and `r = D − fee_bps` (9 970 at 30 bp):
//!
//! ```text
//! amount_out = ⌊ amount_in·r·reserve_out / (reserve_in·D + amount_in·r) ⌋
//! amount_in  = ⌊ reserve_in·amount_out·D / ((reserve_out − amount_out)·r) ⌋ + 1
//! ```
//!
//! The output rounds down and the input rounds up, so a trade sized by
//! either quote always satisfies the pool invariant.

use crate::domain::{Amount, FeeTier, Rounding};
use crate::error::{AmmError, Result};
use crate::math::{mul_div, CheckedArithmetic};

/// Largest output obtainable for `amount_in`.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] for inputs far beyond any pool's reserve cap.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::{Amount, FeeTier};
/// use xyk_amm::router::amount_out;
///
/// let out = amount_out(
///     Amount::new(1_000),
///     Amount::new(100_000),
///     Amount::new(100_000),
///     FeeTier::TIER_0_30_PERCENT,
/// );
/// assert_eq!(out, Ok(Amount::new(987)));
/// ```
pub fn amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let in_with_fee = amount_in.widen().safe_mul(&fee.retained())?;
    let denominator = reserve_in
        .widen()
        .safe_mul(&fee.denominator())?
        .safe_add(&in_with_fee)?;
    let out = mul_div(in_with_fee, reserve_out.widen(), denominator, Rounding::Down)
        .ok_or(AmmError::Overflow("quote numerator"))?;
    Amount::from_wide(out).ok_or(AmmError::Overflow("quoted output"))
}

/// Smallest input that buys `amount_out`.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out` is not strictly below `reserve_out`.
/// - [`AmmError::DivisionByZero`] if the fee keeps nothing of the input.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::{Amount, FeeTier};
/// use xyk_amm::router::amount_in;
///
/// let needed = amount_in(
///     Amount::new(987),
///     Amount::new(100_000),
///     Amount::new(100_000),
///     FeeTier::TIER_0_30_PERCENT,
/// );
/// assert_eq!(needed, Ok(Amount::new(1_000)));
/// ```
pub fn amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = reserve_in
        .widen()
        .safe_mul(&amount_out.widen())?
        .safe_mul(&fee.denominator())?;
    let denominator = reserve_out
        .safe_sub(&amount_out)?
        .widen()
        .safe_mul(&fee.retained())?;
    let needed = numerator
        .safe_div(&denominator, Rounding::Down)?
        .safe_add(&ethnum::U256::ONE)?;
    Amount::from_wide(needed).ok_or(AmmError::Overflow("quoted input"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BasisPoints;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn out(a: u128, r_in: u128, r_out: u128) -> Result<Amount> {
        amount_out(
            Amount::new(a),
            Amount::new(r_in),
            Amount::new(r_out),
            FeeTier::TIER_0_30_PERCENT,
        )
    }

    fn inp(a: u128, r_in: u128, r_out: u128) -> Result<Amount> {
        amount_in(
            Amount::new(a),
            Amount::new(r_in),
            Amount::new(r_out),
            FeeTier::TIER_0_30_PERCENT,
        )
    }

    // -- amount_out -----------------------------------------------------------

    #[test]
    fn reference_output_vectors() {
        let cases = [
            (1, 5, 10, 1_662_497_915_624_478_906u128),
            (1, 10, 5, 453_305_446_940_074_565),
            (2, 5, 10, 2_851_015_155_847_869_602),
            (2, 10, 5, 831_248_957_812_239_453),
            (1, 10, 10, 906_610_893_880_149_131),
            (1, 100, 100, 987_158_034_397_061_298),
            (1, 1_000, 1_000, 996_006_981_039_903_216),
        ];
        for (a, r_in, r_out, expected) in cases {
            assert_eq!(
                out(a * E18, r_in * E18, r_out * E18),
                Ok(Amount::new(expected)),
                "swap {a} into {r_in}/{r_out}"
            );
        }
    }

    #[test]
    fn uneven_reserves() {
        assert_eq!(
            out(E18, 1_000 * E18, 4_000 * E18),
            Ok(Amount::new(3_984_027_924_159_612_865))
        );
    }

    #[test]
    fn output_argument_checks() {
        assert_eq!(out(0, 100, 100), Err(AmmError::InsufficientInputAmount));
        assert_eq!(out(1, 0, 100), Err(AmmError::InsufficientLiquidity));
        assert_eq!(out(1, 100, 0), Err(AmmError::InsufficientLiquidity));
    }

    #[test]
    fn zero_fee_is_plain_constant_product() {
        let r = amount_out(
            Amount::new(100),
            Amount::new(1_000),
            Amount::new(1_000),
            FeeTier::new(BasisPoints::ZERO),
        );
        // 100 * 1000 / 1100
        assert_eq!(r, Ok(Amount::new(90)));
    }

    // -- amount_in ------------------------------------------------------------

    #[test]
    fn reference_input_vector() {
        assert_eq!(
            inp(E18, 1_000 * E18, 1_000 * E18),
            Ok(Amount::new(1_004_013_040_121_365_097))
        );
    }

    #[test]
    fn input_argument_checks() {
        assert_eq!(inp(0, 100, 100), Err(AmmError::InsufficientOutputAmount));
        assert_eq!(inp(1, 0, 100), Err(AmmError::InsufficientLiquidity));
        assert_eq!(inp(100, 100, 100), Err(AmmError::InsufficientLiquidity));
        assert_eq!(inp(101, 100, 100), Err(AmmError::InsufficientLiquidity));
    }

    #[test]
    fn full_fee_cannot_buy() {
        let r = amount_in(
            Amount::new(1),
            Amount::new(100),
            Amount::new(100),
            FeeTier::new(BasisPoints::MAX_PERCENT),
        );
        assert_eq!(r, Err(AmmError::DivisionByZero));
    }

    #[test]
    fn quoted_input_buys_at_least_the_output() {
        let Ok(needed) = inp(E18, 1_000 * E18, 1_000 * E18) else {
            panic!("expected Ok");
        };
        let Ok(got) = out(needed.get(), 1_000 * E18, 1_000 * E18) else {
            panic!("expected Ok");
        };
        assert!(got >= Amount::new(E18));
    }
}
