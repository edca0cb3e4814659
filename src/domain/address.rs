//! Opaque 32-byte identifier for assets, accounts, and pools.

use core::fmt;

/// Namespace byte stamped on derived pool addresses.
const POOL_NAMESPACE: u8 = 0xA7;

/// A chain-agnostic address naming an asset, an account, or a pool.
///
/// Wraps a fixed-size `[u8; 32]`. Every byte sequence is valid; the
/// all-zero address is the null identifier and doubles as the holder of
/// permanently locked liquidity.
///
/// Ordering is lexicographic over the bytes, which is what gives
/// [`TokenPair`](super::TokenPair) its canonical ordering.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(!addr.is_zero());
/// assert!(Address::zero().is_zero());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the null address.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Derives the address of the `index`-th pool created by a registry.
    ///
    /// The derivation depends only on the creation index, so the address of
    /// the next pool can be computed before it exists.
    #[must_use]
    pub const fn pool(index: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = POOL_NAMESPACE;
        let idx = index.to_be_bytes();
        let mut i = 0;
        while i < idx.len() {
            bytes[24 + i] = idx[i];
            i += 1;
        }
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address")
            .field(&format_args!("{self}"))
            .finish()
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; 32];
        let addr = Address::from_bytes(bytes);
        assert_eq!(addr.as_bytes(), bytes);
    }

    #[test]
    fn zero_is_null() {
        assert!(Address::zero().is_zero());
        assert_eq!(Address::default(), Address::zero());
        assert!(!Address::from_bytes([1u8; 32]).is_zero());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let lo = Address::from_bytes([0u8; 32]);
        let hi = Address::from_bytes([1u8; 32]);
        assert!(lo < hi);

        // first differing byte decides
        let mut a = [5u8; 32];
        let mut b = [5u8; 32];
        a[31] = 1;
        b[0] = 4;
        assert!(Address::from_bytes(b) < Address::from_bytes(a));
    }

    #[test]
    fn pool_addresses_are_distinct_and_stable() {
        assert_ne!(Address::pool(0), Address::pool(1));
        assert_eq!(Address::pool(7), Address::pool(7));
        assert!(!Address::pool(0).is_zero());
        assert_eq!(Address::pool(258).as_bytes()[30..], [1, 2]);
    }

    #[test]
    fn display_is_hex() {
        let shown = Address::from_bytes([0xab; 32]).to_string();
        assert!(shown.starts_with("0xabab"));
        assert_eq!(shown.len(), 2 + 64);
    }

    #[test]
    fn debug_is_hex() {
        let addr = Address::pool(1);
        let shown = format!("{addr:?}");
        assert_eq!(shown, format!("Address({addr})"));
        assert!(shown.starts_with("Address(0xa700"));
        assert!(shown.ends_with("01)"));
    }
}
