//! Fundamental domain value types used throughout the engine.
//!
//! Addresses, amounts, liquidity shares, fee tiers, canonical pairs, and
//! router requests.  All types are small newtypes or plain enums with
//! validated constructors where an invariant exists.

mod address;
mod amount;
mod basis_points;
mod fee_tier;
mod liquidity;
mod rounding;
mod swap_spec;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use fee_tier::FeeTier;
pub use liquidity::Liquidity;
pub use rounding::Rounding;
pub use swap_spec::{Route, SwapOrder, SwapSpec};
pub use token_pair::TokenPair;
