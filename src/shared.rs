//! Thread-safe handle to an [`Exchange`].

use std::sync::{Arc, RwLock};

use tracing::error;

use crate::domain::{Address, Amount, SwapOrder};
use crate::error::{AmmError, Result};
use crate::exchange::Exchange;
use crate::traits::TokenLedger;

/// Cloneable, `Send + Sync` handle around one [`Exchange`].
///
/// Reads (quotes, lookups) run concurrently; every mutation takes the
/// write lock for its full duration, so a routed swap is never observed
/// half-applied.
///
/// # Examples
///
/// ```rust
/// use std::thread;
///
/// use xyk_amm::domain::Address;
/// use xyk_amm::ledger::InMemoryLedger;
/// use xyk_amm::{Exchange, SharedExchange};
///
/// let admin = Address::from_bytes([9u8; 32]);
/// let shared = SharedExchange::new(Exchange::new(InMemoryLedger::new(), admin));
///
/// let worker = shared.clone();
/// let handle = thread::spawn(move || {
///     worker.create_pool(Address::from_bytes([1u8; 32]), Address::from_bytes([2u8; 32]))
/// });
/// assert!(handle.join().expect("thread").is_ok());
/// assert_eq!(shared.read(|ex| ex.registry().pool_count()), Ok(1));
/// ```
#[derive(Debug)]
pub struct SharedExchange<L> {
    inner: Arc<RwLock<Exchange<L>>>,
}

impl<L> Clone for SharedExchange<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: TokenLedger> SharedExchange<L> {
    /// Wraps `exchange`.
    pub fn new(exchange: Exchange<L>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(exchange)),
        }
    }

    /// Runs `f` under the read lock.
    ///
    /// # Errors
    ///
    /// [`AmmError::LockPoisoned`] if a writer panicked.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Exchange<L>) -> T,
    {
        let guard = self.inner.read().map_err(|e| {
            error!("exchange lock poisoned: {e}");
            AmmError::LockPoisoned
        })?;
        Ok(f(&guard))
    }

    /// Runs `f` under the write lock.
    ///
    /// # Errors
    ///
    /// [`AmmError::LockPoisoned`] if a writer panicked, otherwise whatever
    /// `f` returns.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Exchange<L>) -> Result<T>,
    {
        let mut guard = self.inner.write().map_err(|e| {
            error!("exchange lock poisoned: {e}");
            AmmError::LockPoisoned
        })?;
        f(&mut guard)
    }

    /// See [`Exchange::create_pool`].
    ///
    /// # Errors
    ///
    /// Same as [`Exchange::create_pool`], plus [`AmmError::LockPoisoned`].
    pub fn create_pool(&self, a: Address, b: Address) -> Result<Address> {
        self.write(|ex| ex.create_pool(a, b))
    }

    /// See [`Exchange::quote_route_out`].
    ///
    /// # Errors
    ///
    /// Same as [`Exchange::quote_route_out`], plus [`AmmError::LockPoisoned`].
    pub fn quote_route_out(&self, amount_in: Amount, path: &[Address]) -> Result<Vec<Amount>> {
        self.read(|ex| ex.quote_route_out(amount_in, path))?
    }

    /// See [`Exchange::quote_route_in`].
    ///
    /// # Errors
    ///
    /// Same as [`Exchange::quote_route_in`], plus [`AmmError::LockPoisoned`].
    pub fn quote_route_in(&self, amount_out: Amount, path: &[Address]) -> Result<Vec<Amount>> {
        self.read(|ex| ex.quote_route_in(amount_out, path))?
    }

    /// See [`Exchange::swap_order`].
    ///
    /// # Errors
    ///
    /// Same as [`Exchange::swap_order`], plus [`AmmError::LockPoisoned`].
    pub fn swap_order(&self, sender: Address, order: &SwapOrder, now: u64) -> Result<Vec<Amount>> {
        self.write(|ex| ex.swap_order(sender, order, now))
    }
}
