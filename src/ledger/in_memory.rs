//! A [`TokenLedger`] backed by hash maps.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Address, Amount};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::TokenLedger;

/// In-memory balances and per-asset supply.
///
/// Besides the [`TokenLedger`] operations it can [`freeze`](Self::freeze)
/// an asset, after which every transfer of that asset fails.  Tests use this
/// to model a token that reverts partway through a multi-hop trade.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::{Address, Amount};
/// use xyk_amm::ledger::InMemoryLedger;
/// use xyk_amm::traits::TokenLedger;
///
/// let usd = Address::from_bytes([1u8; 32]);
/// let alice = Address::from_bytes([9u8; 32]);
/// let bob = Address::from_bytes([8u8; 32]);
///
/// let mut ledger = InMemoryLedger::new();
/// ledger.mint(usd, alice, Amount::new(100)).expect("mint");
/// ledger.transfer(usd, alice, bob, Amount::new(40)).expect("transfer");
/// assert_eq!(ledger.balance_of(usd, bob), Amount::new(40));
/// assert_eq!(ledger.total_supply(usd), Amount::new(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: HashMap<(Address, Address), Amount>,
    supply: HashMap<Address, Amount>,
    frozen: HashSet<Address>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total amount of `asset` in existence.
    pub fn total_supply(&self, asset: Address) -> Amount {
        self.supply.get(&asset).copied().unwrap_or_default()
    }

    /// Makes every later transfer of `asset` fail.
    pub fn freeze(&mut self, asset: Address) {
        debug!(%asset, "asset frozen");
        self.frozen.insert(asset);
    }

    /// Lifts a [`freeze`](Self::freeze).
    pub fn unfreeze(&mut self, asset: Address) {
        self.frozen.remove(&asset);
    }

    /// Returns `true` if transfers of `asset` currently fail.
    #[must_use]
    pub fn is_frozen(&self, asset: Address) -> bool {
        self.frozen.contains(&asset)
    }

    fn set_balance(&mut self, asset: Address, owner: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&(asset, owner));
        } else {
            self.balances.insert((asset, owner), amount);
        }
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        if self.is_frozen(asset) {
            return Err(AmmError::TransferFailed("asset frozen"));
        }
        let from_balance = self
            .balance_of(asset, from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed("insufficient balance"))?;
        if from == to || amount.is_zero() {
            return Ok(());
        }
        let to_balance = self.balance_of(asset, to).safe_add(&amount)?;
        self.set_balance(asset, from, from_balance);
        self.set_balance(asset, to, to_balance);
        Ok(())
    }

    fn mint(&mut self, asset: Address, to: Address, amount: Amount) -> Result<()> {
        let supply = self.total_supply(asset).safe_add(&amount)?;
        let balance = self.balance_of(asset, to).safe_add(&amount)?;
        self.supply.insert(asset, supply);
        self.set_balance(asset, to, balance);
        Ok(())
    }

    fn burn(&mut self, asset: Address, from: Address, amount: Amount) -> Result<()> {
        let balance = self
            .balance_of(asset, from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed("insufficient balance"))?;
        let supply = self.total_supply(asset).safe_sub(&amount)?;
        self.supply.insert(asset, supply);
        self.set_balance(asset, from, balance);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn funded() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        let Ok(()) = ledger.mint(addr(1), addr(10), Amount::new(1_000)) else {
            panic!("mint");
        };
        ledger
    }

    #[test]
    fn unknown_balance_is_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance_of(addr(1), addr(2)), Amount::ZERO);
        assert_eq!(ledger.total_supply(addr(1)), Amount::ZERO);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut ledger = funded();
        let Ok(()) = ledger.transfer(addr(1), addr(10), addr(11), Amount::new(300)) else {
            panic!("transfer");
        };
        assert_eq!(ledger.balance_of(addr(1), addr(10)), Amount::new(700));
        assert_eq!(ledger.balance_of(addr(1), addr(11)), Amount::new(300));
        assert_eq!(ledger.total_supply(addr(1)), Amount::new(1_000));
    }

    #[test]
    fn overdraft_fails_without_effect() {
        let mut ledger = funded();
        let before = ledger.clone();
        let r = ledger.transfer(addr(1), addr(10), addr(11), Amount::new(1_001));
        assert_eq!(r, Err(AmmError::TransferFailed("insufficient balance")));
        assert_eq!(ledger, before);
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut ledger = funded();
        let Ok(()) = ledger.transfer(addr(1), addr(10), addr(10), Amount::new(500)) else {
            panic!("transfer");
        };
        assert_eq!(ledger.balance_of(addr(1), addr(10)), Amount::new(1_000));
    }

    #[test]
    fn frozen_asset_rejects_transfers() {
        let mut ledger = funded();
        ledger.freeze(addr(1));
        assert!(ledger.is_frozen(addr(1)));
        let r = ledger.transfer(addr(1), addr(10), addr(11), Amount::new(1));
        assert_eq!(r, Err(AmmError::TransferFailed("asset frozen")));

        ledger.unfreeze(addr(1));
        assert!(ledger
            .transfer(addr(1), addr(10), addr(11), Amount::new(1))
            .is_ok());
    }

    #[test]
    fn burn_reduces_supply() {
        let mut ledger = funded();
        let Ok(()) = ledger.burn(addr(1), addr(10), Amount::new(400)) else {
            panic!("burn");
        };
        assert_eq!(ledger.total_supply(addr(1)), Amount::new(600));
        assert_eq!(
            ledger.burn(addr(1), addr(10), Amount::new(601)),
            Err(AmmError::TransferFailed("insufficient balance"))
        );
    }

    #[test]
    fn mint_overflow() {
        let mut ledger = funded();
        let Err(AmmError::Overflow(_)) = ledger.mint(addr(1), addr(12), Amount::MAX) else {
            panic!("expected Overflow");
        };
    }
}
