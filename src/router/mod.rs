//! Quoting and multi-hop execution over registered pools.
//!
//! - [`amount_out`] / [`amount_in`]: single-hop closed-form quotes.
//! - [`Router`]: chains quotes along a route against live reserves and
//!   executes routed orders through an [`Exchange`](crate::Exchange).

mod quote;
mod swap_router;

pub use quote::{amount_in, amount_out};
pub use swap_router::Router;
