//! Fees and shares in hundredths of a percent.

use core::fmt;

/// Basis points in one whole (100%).
pub(crate) const BPS_DENOMINATOR: u32 = 10_000;

/// A rate in basis points: 30 bp is 0.30%, 10 000 bp is the whole.
///
/// Any `u32` can be stored.  Whether a rate makes sense is decided by the
/// type that uses it (a [`FeeTier`](super::FeeTier) must stay below the
/// whole, for instance).
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::BasisPoints;
///
/// let fee = BasisPoints::new(30);
/// assert_eq!(fee.remainder(), 9_970);
/// assert_eq!(fee.to_string(), "30bp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// The whole, 10 000 bp.
    pub const MAX_PERCENT: Self = Self(BPS_DENOMINATOR);

    /// Wraps a raw basis-point count.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw basis-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Basis points left of the whole after this rate, saturating at zero.
    #[must_use]
    pub const fn remainder(&self) -> u32 {
        BPS_DENOMINATOR.saturating_sub(self.0)
    }

    /// `true` if the rate is strictly less than the whole.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.0 < BPS_DENOMINATOR
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_of_reference_fee() {
        assert_eq!(BasisPoints::new(30).remainder(), 9_970);
        assert_eq!(BasisPoints::ZERO.remainder(), BPS_DENOMINATOR);
        assert_eq!(BasisPoints::MAX_PERCENT.remainder(), 0);
        assert_eq!(BasisPoints::new(12_000).remainder(), 0);
    }

    #[test]
    fn partial_excludes_whole() {
        assert!(BasisPoints::new(9_999).is_partial());
        assert!(!BasisPoints::MAX_PERCENT.is_partial());
    }

    #[test]
    fn display() {
        assert_eq!(BasisPoints::new(5).to_string(), "5bp");
    }
}
