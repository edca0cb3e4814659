//! Protocol parameters for constant-product pools.

use crate::domain::{FeeTier, Liquidity};
use crate::error::AmmError;

/// Protocol parameters applied to every pool of an exchange.
///
/// | Field | Default | Constraint |
/// |-------|---------|------------|
/// | `swap_fee` | 30 bp | below 100% |
/// | `minimum_liquidity` | 1 000 | nonzero |
/// | `price_resolution_bits` | 112 | `1..=128` |
/// | `protocol_fee_divisor` | 6 | at least 2 |
///
/// The protocol fee takes `1 / protocol_fee_divisor` of the growth in
/// `√k` between liquidity events; the default of 6 gives one sixth.
///
/// # Examples
///
/// ```
/// use xyk_amm::config::AmmConfig;
/// use xyk_amm::domain::{FeeTier, Liquidity};
///
/// let cfg = AmmConfig::default();
/// assert_eq!(cfg.swap_fee(), FeeTier::TIER_0_30_PERCENT);
/// assert_eq!(cfg.minimum_liquidity(), Liquidity::new(1_000));
///
/// let bad = AmmConfig::new(FeeTier::TIER_0_30_PERCENT, Liquidity::ZERO, 112, 6);
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AmmConfig {
    swap_fee: FeeTier,
    minimum_liquidity: Liquidity,
    price_resolution_bits: u32,
    protocol_fee_divisor: u32,
}

impl AmmConfig {
    /// Shares permanently locked by the first deposit into a pool.
    pub const DEFAULT_MINIMUM_LIQUIDITY: Liquidity = Liquidity::new(1_000);

    /// Fractional bits of the fixed-point prices fed to the accumulators.
    pub const DEFAULT_PRICE_RESOLUTION_BITS: u32 = 112;

    /// One sixth of the `√k` growth goes to the fee recipient.
    pub const DEFAULT_PROTOCOL_FEE_DIVISOR: u32 = 6;

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if any field is out of
    /// range (see the type-level table).
    pub fn new(
        swap_fee: FeeTier,
        minimum_liquidity: Liquidity,
        price_resolution_bits: u32,
        protocol_fee_divisor: u32,
    ) -> Result<Self, AmmError> {
        let config = Self {
            swap_fee,
            minimum_liquidity,
            price_resolution_bits,
            protocol_fee_divisor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<(), AmmError> {
        if !self.swap_fee.is_valid() {
            return Err(AmmError::InvalidConfiguration("swap fee must be below 100%"));
        }
        if self.minimum_liquidity.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum liquidity must be nonzero",
            ));
        }
        if !(1..=128).contains(&self.price_resolution_bits) {
            return Err(AmmError::InvalidConfiguration(
                "price resolution must be 1 to 128 bits",
            ));
        }
        if self.protocol_fee_divisor < 2 {
            return Err(AmmError::InvalidConfiguration(
                "protocol fee divisor must be at least 2",
            ));
        }
        Ok(())
    }

    /// Returns a copy with a different swap fee.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn with_swap_fee(self, swap_fee: FeeTier) -> Result<Self, AmmError> {
        Self::new(
            swap_fee,
            self.minimum_liquidity,
            self.price_resolution_bits,
            self.protocol_fee_divisor,
        )
    }

    /// The fee charged on every swap input.
    #[must_use]
    pub const fn swap_fee(&self) -> FeeTier {
        self.swap_fee
    }

    /// Shares locked to the null address on a pool's first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }

    /// Fractional bits of accumulated prices.
    #[must_use]
    pub const fn price_resolution_bits(&self) -> u32 {
        self.price_resolution_bits
    }

    /// Denominator `d` of the protocol's `1/d` share of fee growth.
    #[must_use]
    pub const fn protocol_fee_divisor(&self) -> u32 {
        self.protocol_fee_divisor
    }
}

impl Default for AmmConfig {
    fn default() -> Self {
        Self {
            swap_fee: FeeTier::TIER_0_30_PERCENT,
            minimum_liquidity: Self::DEFAULT_MINIMUM_LIQUIDITY,
            price_resolution_bits: Self::DEFAULT_PRICE_RESOLUTION_BITS,
            protocol_fee_divisor: Self::DEFAULT_PROTOCOL_FEE_DIVISOR,
        }
    }
}

// Deserializing goes through `new`, so a loaded config is always valid.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AmmConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Fields {
            swap_fee: FeeTier,
            minimum_liquidity: Liquidity,
            price_resolution_bits: u32,
            protocol_fee_divisor: u32,
        }

        let f = Fields::deserialize(deserializer)?;
        Self::new(
            f.swap_fee,
            f.minimum_liquidity,
            f.price_resolution_bits,
            f.protocol_fee_divisor,
        )
        .map_err(serde::de::Error::custom)
    }
}
