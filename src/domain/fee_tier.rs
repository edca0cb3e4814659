//! Swap fee tiers built on [`BasisPoints`].

use core::fmt;

use ethnum::U256;

use super::basis_points::BPS_DENOMINATOR;
use super::{Amount, BasisPoints};

/// The swap fee charged on every input leg, in basis points.
///
/// The pool never computes the fee as a separate amount.  It scales
/// balances by the basis-point denominator and subtracts `input × bps`,
/// which keeps the constant-product check exact in integers:
///
/// ```text
/// adjusted = balance × 10 000 − amount_in × bps
/// ```
///
/// With the default 30 bp this is the reference protocol's
/// `balance × 1000 − amount_in × 3`, scaled by ten.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::FeeTier;
///
/// let tier = FeeTier::TIER_0_30_PERCENT;
/// assert_eq!(tier.basis_points().get(), 30);
/// assert!(tier.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// 0.05% fee (5 bp).
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% fee (30 bp), the reference constant-product fee.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee (100 bp).
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// A fee tier is usable only if it leaves a nonzero share of the input.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0.is_partial()
    }

    /// The scaling denominator (10 000) as a wide integer.
    #[must_use]
    pub const fn denominator(&self) -> U256 {
        U256::new(BPS_DENOMINATOR as u128)
    }

    /// The fee numerator as a wide integer.
    #[must_use]
    pub const fn numerator(&self) -> U256 {
        U256::new(self.0.get() as u128)
    }

    /// The share of each input that counts toward pricing
    /// (`10 000 − bps`, i.e. 9 970 at 30 bp).
    ///
    /// Saturates at zero for an invalid tier.
    #[must_use]
    pub const fn retained(&self) -> U256 {
        U256::new(self.0.remainder() as u128)
    }

    /// Fee-adjusted balance: `balance × 10 000 − amount_in × bps`.
    ///
    /// Returns `None` if `amount_in × bps` exceeds the scaled balance,
    /// which only happens when more input is claimed than is held.
    #[must_use]
    pub fn adjusted_balance(&self, balance: Amount, amount_in: Amount) -> Option<U256> {
        let scaled = balance.widen().checked_mul(self.denominator())?;
        let fee = amount_in.widen().checked_mul(self.numerator())?;
        scaled.checked_sub(fee)
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_0_30_PERCENT
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(FeeTier::TIER_0_05_PERCENT.basis_points().get(), 5);
        assert_eq!(FeeTier::TIER_1_00_PERCENT.basis_points().get(), 100);
        assert_eq!(FeeTier::default(), FeeTier::TIER_0_30_PERCENT);
    }

    #[test]
    fn validity() {
        assert!(FeeTier::new(BasisPoints::ZERO).is_valid());
        assert!(FeeTier::new(BasisPoints::new(9_999)).is_valid());
        assert!(!FeeTier::new(BasisPoints::MAX_PERCENT).is_valid());
    }

    #[test]
    fn retained_share() {
        assert_eq!(FeeTier::TIER_0_30_PERCENT.retained(), U256::new(9_970));
        assert_eq!(FeeTier::new(BasisPoints::new(20_000)).retained(), U256::ZERO);
    }

    #[test]
    fn adjusted_balance_matches_thousandths_form() {
        // (1000 * 1000 - 100 * 3) * 10 == 1000 * 10_000 - 100 * 30
        let tier = FeeTier::TIER_0_30_PERCENT;
        let adjusted = tier.adjusted_balance(Amount::new(1_000), Amount::new(100));
        assert_eq!(adjusted, Some(U256::new((1_000 * 1_000 - 100 * 3) * 10)));
    }

    #[test]
    fn adjusted_balance_rejects_impossible_input() {
        let tier = FeeTier::new(BasisPoints::new(9_000));
        assert_eq!(tier.adjusted_balance(Amount::new(1), Amount::new(10)), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", FeeTier::TIER_0_30_PERCENT), "FeeTier(30bp)");
    }
}
