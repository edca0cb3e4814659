//! The constant-product pair pool.
//!
//! [`Pool`] holds one pair's reserves, LP-share supply, and price
//! accumulators.  Its mutating operations are reached through
//! [`Exchange`](crate::Exchange), which supplies the ledger, configuration,
//! and event log and makes each call all-or-nothing.

mod constant_product;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use constant_product::{FlashSwap, Pool, Reserves, MAX_RESERVE};

pub(crate) use constant_product::PoolContext;
