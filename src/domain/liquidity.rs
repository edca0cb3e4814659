//! Liquidity-share units.

use core::fmt;

use ethnum::U256;

/// A quantity of a pool's liquidity-position (LP) token.
///
/// This is distinct from [`Amount`](super::Amount) because it measures a
/// pro-rata claim on a pool's reserves, not a quantity of any traded asset.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// let b = Liquidity::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Liquidity::new(3_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Liquidity(u128);

impl Liquidity {
    /// No liquidity.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Liquidity` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the liquidity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens to 256 bits for intermediate products.
    #[must_use]
    pub const fn widen(&self) -> U256 {
        U256::new(self.0)
    }

    /// Narrows a 256-bit value back to liquidity units.
    ///
    /// Returns `None` if the value does not fit in 128 bits.
    #[must_use]
    pub fn from_wide(value: U256) -> Option<Self> {
        let (hi, lo) = value.into_words();
        if hi == 0 {
            Some(Self(lo))
        } else {
            None
        }
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
