//! # xyk-amm
//!
//! Constant-product (x·y = k) exchange engine: pair pools with LP shares,
//! a registry that deduplicates pairs, and a router that quotes and
//! executes multi-hop swaps atomically.
//!
//! All amounts are unsigned integers.  Products that can exceed 128 bits
//! are computed in 256-bit arithmetic ([`ethnum::U256`]); reserves are capped
//! at 112 bits so that price accumulators and `reserve0 × reserve1` always
//! fit.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize`/`Deserialize` for domain types, config, and events |
//!
//! # Quick Start
//!
//! ```rust
//! use xyk_amm::domain::{Address, Amount, SwapOrder, SwapSpec};
//! use xyk_amm::ledger::InMemoryLedger;
//! use xyk_amm::traits::TokenLedger;
//! use xyk_amm::Exchange;
//!
//! let admin = Address::from_bytes([9u8; 32]);
//! let lp = Address::from_bytes([10u8; 32]);
//! let trader = Address::from_bytes([11u8; 32]);
//! let usdc = Address::from_bytes([1u8; 32]);
//! let weth = Address::from_bytes([2u8; 32]);
//!
//! let mut ex = Exchange::new(InMemoryLedger::new(), admin);
//!
//! // 1. Create the pair and seed it
//! let pool = ex.create_pool(usdc, weth).expect("new pair");
//! ex.ledger_mut().mint(usdc, pool, Amount::new(100_000)).expect("fund");
//! ex.ledger_mut().mint(weth, pool, Amount::new(100_000)).expect("fund");
//! ex.mint(pool, lp, lp, 0).expect("first deposit");
//!
//! // 2. Sell 1 000 USDC for WETH, accepting no less than 980
//! ex.ledger_mut().mint(usdc, trader, Amount::new(1_000)).expect("fund");
//! let order = SwapOrder::new(
//!     SwapSpec::exact_in(Amount::new(1_000), Amount::new(980)),
//!     vec![usdc, weth],
//!     trader,
//!     60,
//! );
//! let amounts = ex.swap_order(trader, &order, 1).expect("swap");
//!
//! assert_eq!(amounts, vec![Amount::new(1_000), Amount::new(987)]);
//! assert_eq!(ex.ledger().balance_of(weth, trader), Amount::new(987));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  SharedExchange  │  Arc<RwLock<..>> handle for concurrent callers
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Exchange     │  ledger + registry + events, all-or-nothing calls
//! └───┬──────────┬───┘
//!     │          │ Router: quote along a path, execute hop by hop
//!     ▼          ▼
//! ┌────────┐ ┌────────┐
//! │Registry│→│  Pool  │  reserves, LP supply, oracle accumulators
//! └────────┘ └───┬────┘
//!                │ TokenLedger
//!                ▼
//!          ┌──────────┐
//!          │  Ledger  │  balances of every asset, LP shares included
//!          └──────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`SwapOrder`](domain::SwapOrder), etc. |
//! | [`pool`] | The pair [`Pool`](pool::Pool) |
//! | [`registry`] | [`Registry`](registry::Registry) of pools and fee settings |
//! | [`router`] | Closed-form quotes and the multi-hop [`Router`](router::Router) |
//! | [`exchange`] | [`Exchange`] context object with rollback |
//! | [`shared`] | [`SharedExchange`] thread-safe handle |
//! | [`traits`] | [`TokenLedger`](traits::TokenLedger) collaborator interface |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) reference ledger |
//! | [`config`] | [`AmmConfig`](config::AmmConfig) protocol parameters |
//! | [`events`] | [`Event`](events::Event) records of state changes |
//! | [`math`] | Checked arithmetic, rounding division, square root, fixed point |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod exchange;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod registry;
pub mod router;
pub mod shared;
pub mod traits;

pub use exchange::Exchange;
pub use shared::SharedExchange;
