//! The exchange: registry, ledger, configuration, and event log in one
//! context object.
//!
//! Every state-changing call goes through [`Exchange`] and is
//! all-or-nothing: on any error the registry (with every pool), the ledger,
//! and the event log are restored to their state before the call.
//!
//! # Usage
//!
//! ```rust
//! use xyk_amm::domain::{Address, Amount};
//! use xyk_amm::ledger::InMemoryLedger;
//! use xyk_amm::traits::TokenLedger;
//! use xyk_amm::Exchange;
//!
//! let admin = Address::from_bytes([9u8; 32]);
//! let alice = Address::from_bytes([10u8; 32]);
//! let usd = Address::from_bytes([1u8; 32]);
//! let eur = Address::from_bytes([2u8; 32]);
//!
//! let mut ex = Exchange::new(InMemoryLedger::new(), admin);
//! let pool = ex.create_pool(usd, eur).expect("new pair");
//!
//! ex.ledger_mut().mint(usd, pool, Amount::new(1_000_000)).expect("fund");
//! ex.ledger_mut().mint(eur, pool, Amount::new(1_000_000)).expect("fund");
//! let shares = ex.mint(pool, alice, alice, 0).expect("first deposit");
//! assert_eq!(shares.get(), 1_000_000 - 1_000);
//! ```

use tracing::debug;

use crate::config::AmmConfig;
use crate::domain::{Address, Amount, Liquidity, SwapOrder};
use crate::error::Result;
use crate::events::Event;
use crate::pool::{FlashSwap, Pool, PoolContext};
use crate::registry::Registry;
use crate::router::Router;
use crate::traits::TokenLedger;

/// Owns every pool and the ledger they settle against.
///
/// Methods that mutate take `&mut self`, so a single `Exchange` has one
/// writer at a time.  Wrap it in a [`SharedExchange`](crate::SharedExchange)
/// to share it across threads.
///
/// Timestamps (`now`) are supplied by the caller in seconds; the engine
/// never reads a clock.
///
/// # Costs
///
/// Rollback is snapshot based: every mutating call clones the whole
/// [`Registry`] and the whole ledger before it runs, whether or not it
/// later fails.  A call therefore costs time and memory linear in the
/// number of pools plus the size of the ledger.  Hosts with large ledgers
/// should back [`TokenLedger`] with a type whose `Clone` is cheap, such as
/// a persistent map.
///
/// The event log is never trimmed by the exchange.  It grows with every
/// successful call until the host drains it with
/// [`take_events`](Self::take_events).
#[derive(Debug, Clone)]
pub struct Exchange<L> {
    config: AmmConfig,
    registry: Registry,
    ledger: L,
    events: Vec<Event>,
}

impl<L: TokenLedger> Exchange<L> {
    /// Creates an exchange with the default [`AmmConfig`].
    pub fn new(ledger: L, fee_controller: Address) -> Self {
        Self {
            config: AmmConfig::default(),
            registry: Registry::new(fee_controller),
            ledger,
            events: Vec::new(),
        }
    }

    /// Creates an exchange with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`](crate::error::AmmError::InvalidConfiguration)
    /// if `config` fails validation.
    pub fn with_config(ledger: L, fee_controller: Address, config: AmmConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Registry::new(fee_controller),
            ledger,
            events: Vec::new(),
        })
    }

    /// The protocol parameters.
    pub const fn config(&self) -> &AmmConfig {
        &self.config
    }

    /// Read access to pools and fee settings.
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read access to the ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access for funding accounts and depositing into pools.
    ///
    /// Pools pick up deposits on their next `mint`, `swap`, or `sync`.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Events from every successful call, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Removes and returns the event log, leaving it empty.
    ///
    /// Hosts should call this regularly; the log is otherwise unbounded.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// A router pricing at this exchange's swap fee.
    pub const fn router(&self) -> Router {
        Router::new(self.config.swap_fee())
    }

    /// Read access to one pool.
    pub fn pool(&self, address: Address) -> Option<&Pool> {
        self.registry.pool(address)
    }

    /// Runs `op` against this exchange, restoring all state if it fails.
    ///
    /// Clones the registry and the ledger up front; see the type-level
    /// costs section.  Calls nest: an inner failure handled by `op` rolls back only the
    /// inner call.
    ///
    /// # Errors
    ///
    /// Whatever `op` returns.
    pub fn atomically<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let registry = self.registry.clone();
        let ledger = self.ledger.clone();
        let mark = self.events.len();
        match op(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                let discarded = self.events.len().saturating_sub(mark);
                debug!(%error, discarded, "rolled back");
                self.registry = registry;
                self.ledger = ledger;
                self.events.truncate(mark);
                Err(error)
            }
        }
    }

    // -- registry ---------------------------------------------------------

    /// Creates the pool for `(a, b)`.
    ///
    /// # Errors
    ///
    /// `IdenticalAssets`, `ZeroAsset`, or `PoolExists`, in that order.
    pub fn create_pool(&mut self, a: Address, b: Address) -> Result<Address> {
        self.atomically(|ex| ex.registry.create_pool(a, b, &mut ex.events))
    }

    /// Sets or clears the protocol-fee recipient.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the fee controller.
    pub fn set_fee_recipient(
        &mut self,
        caller: Address,
        recipient: Option<Address>,
    ) -> Result<()> {
        self.atomically(|ex| {
            ex.registry
                .set_fee_recipient(caller, recipient, &mut ex.events)
        })
    }

    /// Hands control of fee settings to `controller`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the fee controller.
    pub fn set_fee_controller(&mut self, caller: Address, controller: Address) -> Result<()> {
        self.atomically(|ex| {
            ex.registry
                .set_fee_controller(caller, controller, &mut ex.events)
        })
    }

    // -- pool operations --------------------------------------------------

    /// Issues LP shares for tokens already deposited into `pool`.
    ///
    /// # Errors
    ///
    /// `PoolNotFound`, `InsufficientInitialLiquidity`, `ZeroLiquidityMinted`,
    /// or `Overflow` past the reserve cap.
    pub fn mint(
        &mut self,
        pool: Address,
        sender: Address,
        to: Address,
        now: u64,
    ) -> Result<Liquidity> {
        self.atomically(|ex| ex.with_pool(pool, sender, now, |p, ctx| p.mint(ctx, to)))
    }

    /// Redeems the LP shares `pool` holds on its own address.
    ///
    /// Callers first transfer shares (ledger asset `pool`) to `pool`.
    ///
    /// # Errors
    ///
    /// `PoolNotFound`, `InsufficientLiquidityBurned`, or `TransferFailed`.
    pub fn burn(
        &mut self,
        pool: Address,
        sender: Address,
        to: Address,
        now: u64,
    ) -> Result<(Amount, Amount)> {
        self.atomically(|ex| ex.with_pool(pool, sender, now, |p, ctx| p.burn(ctx, to)))
    }

    /// Low-level swap: sends the requested outputs to `to` and checks the
    /// invariant against whatever input has been deposited.
    ///
    /// Returns the inferred `(amount0_in, amount1_in)`.
    ///
    /// # Errors
    ///
    /// `PoolNotFound` or any swap rejection (see [`AmmError`](crate::error::AmmError)).
    pub fn swap(
        &mut self,
        pool: Address,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        now: u64,
    ) -> Result<(Amount, Amount)> {
        self.atomically(|ex| ex.swap_in_place(pool, sender, amount0_out, amount1_out, to, now))
    }

    /// Swap whose input is supplied by `hook` after the outputs are sent.
    ///
    /// The hook sees only the ledger and a [`FlashSwap`] description, so it
    /// cannot reenter the pool.
    ///
    /// # Errors
    ///
    /// Same as [`swap`](Self::swap), plus anything the hook returns.
    #[allow(clippy::too_many_arguments)]
    pub fn flash_swap<H>(
        &mut self,
        pool: Address,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        now: u64,
        hook: H,
    ) -> Result<(Amount, Amount)>
    where
        H: FnOnce(&mut L, &FlashSwap) -> Result<()>,
    {
        self.atomically(|ex| {
            ex.with_pool(pool, sender, now, |p, ctx| {
                p.swap(ctx, amount0_out, amount1_out, to, hook)
            })
        })
    }

    /// Sets `pool`'s reserves to its balances.
    ///
    /// # Errors
    ///
    /// `PoolNotFound`, or `Overflow` past the reserve cap.
    pub fn sync(&mut self, pool: Address, now: u64) -> Result<()> {
        self.atomically(|ex| ex.with_pool(pool, Address::zero(), now, |p, ctx| p.sync(ctx)))
    }

    /// Sends `pool`'s balances above its reserves to `to`.
    ///
    /// # Errors
    ///
    /// `PoolNotFound` or `TransferFailed`.
    pub fn skim(&mut self, pool: Address, to: Address) -> Result<(Amount, Amount)> {
        self.atomically(|ex| {
            let pool = ex.registry.pool_mut(pool)?;
            pool.skim(&mut ex.ledger, to)
        })
    }

    // -- routing ----------------------------------------------------------

    /// Reserves of the `(a, b)` pool as `(reserve_a, reserve_b)`.
    ///
    /// # Errors
    ///
    /// `InvalidRoute` if there is no such pool.
    pub fn reserves_for(&self, a: Address, b: Address) -> Result<(Amount, Amount)> {
        self.router().reserves_for(&self.registry, a, b)
    }

    /// See [`Router::quote_route_out`].
    ///
    /// # Errors
    ///
    /// Same as [`Router::quote_route_out`].
    pub fn quote_route_out(&self, amount_in: Amount, path: &[Address]) -> Result<Vec<Amount>> {
        self.router().quote_route_out(&self.registry, amount_in, path)
    }

    /// See [`Router::quote_route_in`].
    ///
    /// # Errors
    ///
    /// Same as [`Router::quote_route_in`].
    pub fn quote_route_in(&self, amount_out: Amount, path: &[Address]) -> Result<Vec<Amount>> {
        self.router().quote_route_in(&self.registry, amount_out, path)
    }

    /// See [`Router::swap_exact_in`].
    ///
    /// # Errors
    ///
    /// Same as [`Router::swap_exact_in`].
    pub fn swap_exact_in(
        &mut self,
        sender: Address,
        order: &SwapOrder,
        now: u64,
    ) -> Result<Vec<Amount>> {
        self.router().swap_exact_in(self, sender, order, now)
    }

    /// See [`Router::swap_exact_out`].
    ///
    /// # Errors
    ///
    /// Same as [`Router::swap_exact_out`].
    pub fn swap_exact_out(
        &mut self,
        sender: Address,
        order: &SwapOrder,
        now: u64,
    ) -> Result<Vec<Amount>> {
        self.router().swap_exact_out(self, sender, order, now)
    }

    /// Executes `order`, exact-input or exact-output as its `SwapSpec` says.
    ///
    /// # Errors
    ///
    /// Same as [`Router::swap`].
    pub fn swap_order(
        &mut self,
        sender: Address,
        order: &SwapOrder,
        now: u64,
    ) -> Result<Vec<Amount>> {
        self.router().swap(self, sender, order, now)
    }

    // -- crate internals --------------------------------------------------

    /// Swap without its own snapshot, for callers already inside
    /// [`atomically`](Self::atomically).
    pub(crate) fn swap_in_place(
        &mut self,
        pool: Address,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        now: u64,
    ) -> Result<(Amount, Amount)> {
        self.with_pool(pool, sender, now, |p, ctx| {
            p.swap(ctx, amount0_out, amount1_out, to, |_, _| Ok(()))
        })
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn with_pool<T, F>(&mut self, pool: Address, sender: Address, now: u64, op: F) -> Result<T>
    where
        F: FnOnce(&mut Pool, &mut PoolContext<'_, L>) -> Result<T>,
    {
        let fee_recipient = self.registry.fee_recipient();
        let pool = self.registry.pool_mut(pool)?;
        let mut ctx = PoolContext {
            ledger: &mut self.ledger,
            config: &self.config,
            fee_recipient,
            sender,
            now,
            events: &mut self.events,
        };
        op(pool, &mut ctx)
    }
}
