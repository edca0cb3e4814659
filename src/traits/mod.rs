//! Seams between the engine and its collaborators.
//!
//! The engine never owns token balances.  It reaches them only through
//! [`TokenLedger`], so any ledger (an in-memory map, a chain adapter, a
//! database) can back an [`Exchange`](crate::Exchange).

mod token_ledger;

pub use token_ledger::TokenLedger;
