//! Pair registry: one pool per unordered pair, plus protocol-fee settings.
//!
//! The [`Registry`] is the only place pools are created.  It deduplicates
//! pairs regardless of argument order, enumerates pools in creation order,
//! and guards the fee recipient behind a single fee-controller account.
//!
//! # Usage
//!
//! ```rust
//! use xyk_amm::domain::Address;
//! use xyk_amm::ledger::InMemoryLedger;
//! use xyk_amm::Exchange;
//!
//! let admin = Address::from_bytes([9u8; 32]);
//! let usd = Address::from_bytes([1u8; 32]);
//! let eur = Address::from_bytes([2u8; 32]);
//!
//! let mut exchange = Exchange::new(InMemoryLedger::new(), admin);
//! let pool = exchange.create_pool(usd, eur).expect("new pair");
//!
//! let registry = exchange.registry();
//! assert_eq!(registry.get_pool(eur, usd), Some(pool));
//! assert_eq!(registry.pool_at(0), Ok(pool));
//! ```

mod pair_registry;

pub use pair_registry::Registry;
