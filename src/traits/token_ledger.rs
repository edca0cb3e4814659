//! The fungible-token ledger interface.
//!
//! A pool holds its reserves as ordinary balances on the ledger under its
//! own [`Address`], and its LP shares are a ledger asset whose id is that
//! same address.  The four methods below are everything the engine needs.
//!
//! # Failure model
//!
//! A failed [`transfer`](TokenLedger::transfer) is fatal to the enclosing
//! engine call: the exchange rolls back every effect of the call, including
//! the ledger itself.  That rollback works by cloning, hence the `Clone`
//! bound.

use crate::domain::{Address, Amount};
use crate::error::Result;

/// Balances and transfers of fungible assets.
///
/// # Contract
///
/// - `balance_of` never fails; unknown assets and owners read as zero.
/// - `transfer` either moves exactly `amount` or returns an error and
///   changes nothing.
/// - `mint` and `burn` are called by a pool only on its own LP asset.
pub trait TokenLedger: Clone {
    /// Balance of `owner` in `asset`.
    fn balance_of(&self, asset: Address, owner: Address) -> Amount;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`](crate::error::AmmError::TransferFailed)
    /// if the ledger refuses the transfer.
    fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: Amount)
        -> Result<()>;

    /// Creates `amount` of `asset` in `to`'s balance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`](crate::error::AmmError::Overflow) if a
    /// balance or the supply would exceed `u128`.
    fn mint(&mut self, asset: Address, to: Address, amount: Amount) -> Result<()>;

    /// Destroys `amount` of `asset` from `from`'s balance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`](crate::error::AmmError::TransferFailed)
    /// if `from` holds less than `amount`.
    fn burn(&mut self, asset: Address, from: Address, amount: Amount) -> Result<()>;
}
