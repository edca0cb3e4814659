//! Pair registry implementation.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::{Address, TokenPair};
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::pool::Pool;

/// Creates and indexes pools, one per canonical pair.
///
/// Pools are never removed or replaced.  The `n`-th pool created always
/// lives at [`Address::pool(n)`](Address::pool), so a pool's address is
/// known before it exists.
///
/// # Fee settings
///
/// `fee_recipient` turns the protocol fee on (`Some`) or off (`None`).
/// Only the current `fee_controller` may change either setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pools: Vec<Pool>,
    by_pair: HashMap<TokenPair, usize>,
    by_address: HashMap<Address, usize>,
    fee_recipient: Option<Address>,
    fee_controller: Address,
}

impl Registry {
    /// Creates an empty registry controlled by `fee_controller`, with the
    /// protocol fee off.
    #[must_use]
    pub fn new(fee_controller: Address) -> Self {
        Self {
            pools: Vec::new(),
            by_pair: HashMap::new(),
            by_address: HashMap::new(),
            fee_recipient: None,
            fee_controller,
        }
    }

    /// Creates the pool for `(a, b)` and returns its address.
    ///
    /// # Errors
    ///
    /// In this order:
    ///
    /// - [`AmmError::IdenticalAssets`] if `a == b`.
    /// - [`AmmError::ZeroAsset`] if either is the null address.
    /// - [`AmmError::PoolExists`] if the pair already has a pool.
    pub(crate) fn create_pool(
        &mut self,
        a: Address,
        b: Address,
        events: &mut Vec<Event>,
    ) -> Result<Address> {
        let pair = TokenPair::new(a, b)?;
        if self.by_pair.contains_key(&pair) {
            return Err(AmmError::PoolExists);
        }

        let index = self.pools.len();
        let address = Address::pool(index as u64);
        self.pools.push(Pool::new(address, pair));
        self.by_pair.insert(pair, index);
        self.by_address.insert(address, index);

        info!(
            token0 = %pair.token0(),
            token1 = %pair.token1(),
            pool = %address,
            index,
            "pool created"
        );
        events.push(Event::PoolCreated {
            token0: pair.token0(),
            token1: pair.token1(),
            pool: address,
            index,
        });
        Ok(address)
    }

    /// Address of the pool for `(a, b)` in either order, if one exists.
    #[must_use]
    pub fn get_pool(&self, a: Address, b: Address) -> Option<Address> {
        self.pool_by_pair(a, b).map(Pool::address)
    }

    /// Number of pools created.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Address of the `index`-th pool created.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IndexOutOfRange`] if `index >= pool_count()`.
    pub fn pool_at(&self, index: usize) -> Result<Address> {
        self.pools
            .get(index)
            .map(Pool::address)
            .ok_or(AmmError::IndexOutOfRange {
                index,
                len: self.pools.len(),
            })
    }

    /// Read access to a pool by address.
    #[must_use]
    pub fn pool(&self, address: Address) -> Option<&Pool> {
        self.by_address
            .get(&address)
            .and_then(|&i| self.pools.get(i))
    }

    /// Read access to a pool by pair, in either order.
    #[must_use]
    pub fn pool_by_pair(&self, a: Address, b: Address) -> Option<&Pool> {
        let pair = TokenPair::new(a, b).ok()?;
        self.by_pair.get(&pair).and_then(|&i| self.pools.get(i))
    }

    pub(crate) fn pool_mut(&mut self, address: Address) -> Result<&mut Pool> {
        let index = *self
            .by_address
            .get(&address)
            .ok_or(AmmError::PoolNotFound)?;
        self.pools.get_mut(index).ok_or(AmmError::PoolNotFound)
    }

    /// All pools in creation order.
    pub fn pools(&self) -> impl ExactSizeIterator<Item = &Pool> + '_ {
        self.pools.iter()
    }

    /// Receiver of protocol-fee shares; `None` means the fee is off.
    #[must_use]
    pub const fn fee_recipient(&self) -> Option<Address> {
        self.fee_recipient
    }

    /// Account allowed to change the fee settings.
    #[must_use]
    pub const fn fee_controller(&self) -> Address {
        self.fee_controller
    }

    /// Sets or clears the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Unauthorized`] if `caller` is not the fee
    /// controller.
    pub(crate) fn set_fee_recipient(
        &mut self,
        caller: Address,
        recipient: Option<Address>,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        self.authorize(caller)?;
        let previous = self.fee_recipient;
        self.fee_recipient = recipient;
        info!(?previous, current = ?recipient, "fee recipient changed");
        events.push(Event::FeeRecipientChanged {
            previous,
            current: recipient,
        });
        Ok(())
    }

    /// Hands control of the fee settings to `controller`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Unauthorized`] if `caller` is not the fee
    /// controller.
    pub(crate) fn set_fee_controller(
        &mut self,
        caller: Address,
        controller: Address,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        self.authorize(caller)?;
        let previous = self.fee_controller;
        self.fee_controller = controller;
        info!(%previous, current = %controller, "fee controller changed");
        events.push(Event::FeeControllerChanged {
            previous,
            current: controller,
        });
        Ok(())
    }

    fn authorize(&self, caller: Address) -> Result<()> {
        if caller != self.fee_controller {
            warn!(%caller, controller = %self.fee_controller, "unauthorized fee change");
            return Err(AmmError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const ADMIN: Address = Address::from_bytes([9u8; 32]);

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn registry() -> (Registry, Vec<Event>) {
        (Registry::new(ADMIN), Vec::new())
    }

    // -- create_pool ----------------------------------------------------------

    #[test]
    fn create_and_lookup_both_orders() {
        let (mut reg, mut events) = registry();
        let Ok(pool) = reg.create_pool(addr(2), addr(1), &mut events) else {
            panic!("expected Ok");
        };
        assert_eq!(pool, Address::pool(0));
        assert_eq!(reg.get_pool(addr(1), addr(2)), Some(pool));
        assert_eq!(reg.get_pool(addr(2), addr(1)), Some(pool));
        assert_eq!(reg.pool_count(), 1);

        let Some(p) = reg.pool(pool) else {
            panic!("pool readable");
        };
        assert_eq!(p.token0(), addr(1));
        assert_eq!(p.token1(), addr(2));
        assert_eq!(
            events,
            vec![Event::PoolCreated {
                token0: addr(1),
                token1: addr(2),
                pool,
                index: 0,
            }]
        );
    }

    #[test]
    fn duplicate_pair_rejected_in_either_order() {
        let (mut reg, mut events) = registry();
        let Ok(_) = reg.create_pool(addr(1), addr(2), &mut events) else {
            panic!("expected Ok");
        };
        assert_eq!(
            reg.create_pool(addr(2), addr(1), &mut events),
            Err(AmmError::PoolExists)
        );
        assert_eq!(reg.pool_count(), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn validation_order() {
        let (mut reg, mut events) = registry();
        assert_eq!(
            reg.create_pool(Address::zero(), Address::zero(), &mut events),
            Err(AmmError::IdenticalAssets)
        );
        assert_eq!(
            reg.create_pool(addr(1), Address::zero(), &mut events),
            Err(AmmError::ZeroAsset)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn enumeration_in_creation_order() {
        let (mut reg, mut events) = registry();
        let Ok(first) = reg.create_pool(addr(3), addr(4), &mut events) else {
            panic!("expected Ok");
        };
        let Ok(second) = reg.create_pool(addr(1), addr(2), &mut events) else {
            panic!("expected Ok");
        };
        assert_eq!(reg.pool_at(0), Ok(first));
        assert_eq!(reg.pool_at(1), Ok(second));
        assert_eq!(
            reg.pool_at(2),
            Err(AmmError::IndexOutOfRange { index: 2, len: 2 })
        );
        let order: Vec<_> = reg.pools().map(Pool::address).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn unknown_lookups() {
        let (mut reg, _) = registry();
        assert_eq!(reg.get_pool(addr(1), addr(2)), None);
        assert_eq!(reg.get_pool(addr(1), addr(1)), None);
        assert!(reg.pool(Address::pool(7)).is_none());
        assert_eq!(reg.pool_mut(Address::pool(7)).err(), Some(AmmError::PoolNotFound));
    }

    // -- fee settings ---------------------------------------------------------

    #[test]
    fn only_controller_sets_recipient() {
        let (mut reg, mut events) = registry();
        assert_eq!(
            reg.set_fee_recipient(addr(5), Some(addr(5)), &mut events),
            Err(AmmError::Unauthorized)
        );
        assert_eq!(reg.fee_recipient(), None);

        let Ok(()) = reg.set_fee_recipient(ADMIN, Some(addr(5)), &mut events) else {
            panic!("expected Ok");
        };
        assert_eq!(reg.fee_recipient(), Some(addr(5)));
        assert_eq!(
            events,
            vec![Event::FeeRecipientChanged {
                previous: None,
                current: Some(addr(5)),
            }]
        );
    }

    #[test]
    fn controller_handoff() {
        let (mut reg, mut events) = registry();
        let Ok(()) = reg.set_fee_controller(ADMIN, addr(6), &mut events) else {
            panic!("expected Ok");
        };
        assert_eq!(reg.fee_controller(), addr(6));
        assert_eq!(
            reg.set_fee_recipient(ADMIN, None, &mut events),
            Err(AmmError::Unauthorized)
        );
        assert!(reg.set_fee_recipient(addr(6), None, &mut events).is_ok());
    }
}
