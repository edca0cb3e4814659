//! Engine-wide configuration.
//!
//! [`AmmConfig`] holds the protocol parameters shared by every pool an
//! [`Exchange`](crate::Exchange) creates.  It is validated once at
//! construction and then read-only.

mod amm_config;

pub use amm_config::AmmConfig;
