//! Canonically ordered pair of distinct assets.

use super::Address;
use crate::error::AmmError;

/// An unordered pair of distinct assets, stored in canonical order.
///
/// The canonical ordering guarantees `token0 < token1` (lexicographic
/// byte order), so `(A, B)` and `(B, A)` produce the same pair and the
/// same registry key.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::{Address, TokenPair};
///
/// let a = Address::from_bytes([1u8; 32]);
/// let b = Address::from_bytes([2u8; 32]);
///
/// let pair = TokenPair::new(b, a).expect("distinct assets");
/// assert_eq!(pair.token0(), a);
/// assert_eq!(pair.token1(), b);
/// assert_eq!(pair, TokenPair::new(a, b).expect("distinct assets"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "(Address, Address)", into = "(Address, Address)")
)]
pub struct TokenPair {
    token0: Address,
    token1: Address,
}

impl TokenPair {
    /// Creates a canonically ordered pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if both addresses are equal.
    /// - [`AmmError::ZeroAsset`] if either address is the null address.
    pub fn new(a: Address, b: Address) -> Result<Self, AmmError> {
        if a == b {
            return Err(AmmError::IdenticalAssets);
        }
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };
        // token0 is the smaller, so only it can be the null address
        if token0.is_zero() {
            return Err(AmmError::ZeroAsset);
        }
        Ok(Self { token0, token1 })
    }

    /// Returns the lower-addressed asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Returns the higher-addressed asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `asset` is one side of this pair.
    #[must_use]
    pub fn contains(&self, asset: &Address) -> bool {
        self.token0 == *asset || self.token1 == *asset
    }

    /// Returns `true` if `asset` is `token0`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidRoute`] if `asset` is not in the pair.
    pub fn is_token0(&self, asset: &Address) -> Result<bool, AmmError> {
        if *asset == self.token0 {
            Ok(true)
        } else if *asset == self.token1 {
            Ok(false)
        } else {
            Err(AmmError::InvalidRoute)
        }
    }

    /// Returns the counterpart of `asset` in this pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidRoute`] if `asset` is not in the pair.
    pub fn other(&self, asset: &Address) -> Result<Address, AmmError> {
        if self.is_token0(asset)? {
            Ok(self.token1)
        } else {
            Ok(self.token0)
        }
    }
}

impl TryFrom<(Address, Address)> for TokenPair {
    type Error = AmmError;

    fn try_from((a, b): (Address, Address)) -> Result<Self, AmmError> {
        Self::new(a, b)
    }
}

impl From<TokenPair> for (Address, Address) {
    fn from(pair: TokenPair) -> Self {
        (pair.token0, pair.token1)
    }
}
