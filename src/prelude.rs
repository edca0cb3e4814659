//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use xyk_amm::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, FeeTier, Liquidity, Rounding, Route, SwapOrder, SwapSpec,
    TokenPair,
};

pub use crate::traits::TokenLedger;

pub use crate::math::CheckedArithmetic;

pub use crate::config::AmmConfig;

pub use crate::error::{AmmError, Result};

pub use crate::events::Event;

pub use crate::ledger::InMemoryLedger;
pub use crate::pool::{FlashSwap, Pool, Reserves};
pub use crate::registry::Registry;
pub use crate::router::Router;
pub use crate::{Exchange, SharedExchange};
