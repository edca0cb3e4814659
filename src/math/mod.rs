//! Integer arithmetic for constant-product pricing.
//!
//! Reserves are `u128`; every product of two reserves or of a reserve and a
//! fee-scaled amount is taken in 256-bit space via [`ethnum::U256`].
//!
//! - [`CheckedArithmetic`]: overflow-safe operations returning [`AmmError`](crate::error::AmmError)
//! - [`div_round`] / [`mul_div`]: division with an explicit [`Rounding`](crate::domain::Rounding)
//! - [`isqrt`]: integer square root for share issuance
//! - [`encode_ratio`]: binary fixed-point prices for the accumulators

mod checked;
mod fixed_point;
mod rounding;
mod sqrt;

pub use checked::CheckedArithmetic;
pub use fixed_point::encode_ratio;
pub use rounding::{div_round, mul_div};
pub use sqrt::isqrt;
