//! Structured records of observable state changes.
//!
//! Every successful mutation appends one or more [`Event`]s to the
//! exchange's log.  A call that fails appends nothing: its events are
//! discarded together with its state changes.

use crate::domain::{Address, Amount, Liquidity};

/// One observable state change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event"))]
pub enum Event {
    /// A pool was registered for a new pair.
    PoolCreated {
        /// Lower-addressed asset.
        token0: Address,
        /// Higher-addressed asset.
        token1: Address,
        /// The new pool (and its LP asset).
        pool: Address,
        /// Creation index, equal to the pool count minus one.
        index: usize,
    },
    /// Liquidity was deposited.
    Mint {
        /// Pool that minted.
        pool: Address,
        /// Caller that triggered the mint.
        sender: Address,
        /// Token0 deposited.
        amount0: Amount,
        /// Token1 deposited.
        amount1: Amount,
        /// Receiver of the shares.
        to: Address,
        /// Shares minted to `to`.
        liquidity: Liquidity,
    },
    /// Liquidity was withdrawn.
    Burn {
        /// Pool that burned.
        pool: Address,
        /// Caller that triggered the burn.
        sender: Address,
        /// Token0 returned.
        amount0: Amount,
        /// Token1 returned.
        amount1: Amount,
        /// Receiver of the tokens.
        to: Address,
        /// Shares destroyed.
        liquidity: Liquidity,
    },
    /// A single-pool swap settled.
    Swap {
        /// Pool that swapped.
        pool: Address,
        /// Caller that triggered the swap.
        sender: Address,
        /// Token0 received by the pool.
        amount0_in: Amount,
        /// Token1 received by the pool.
        amount1_in: Amount,
        /// Token0 sent out.
        amount0_out: Amount,
        /// Token1 sent out.
        amount1_out: Amount,
        /// Receiver of the output.
        to: Address,
    },
    /// Stored reserves were updated.
    Sync {
        /// Pool whose reserves changed.
        pool: Address,
        /// New token0 reserve.
        reserve0: Amount,
        /// New token1 reserve.
        reserve1: Amount,
    },
    /// A routed trade completed across every hop.
    RouteSwap {
        /// Payer of the input.
        sender: Address,
        /// First asset of the route.
        token_in: Address,
        /// Last asset of the route.
        token_out: Address,
        /// Input paid into the first pool.
        amount_in: Amount,
        /// Output delivered to `to`.
        amount_out: Amount,
        /// Receiver of the final output.
        to: Address,
    },
    /// The protocol fee recipient was set or cleared.
    FeeRecipientChanged {
        /// Recipient before the change.
        previous: Option<Address>,
        /// Recipient after the change.
        current: Option<Address>,
    },
    /// Control over fee settings moved to a new account.
    FeeControllerChanged {
        /// Controller before the change.
        previous: Address,
        /// Controller after the change.
        current: Address,
    },
}

impl Event {
    /// The pool the event concerns, if it concerns exactly one.
    #[must_use]
    pub const fn pool(&self) -> Option<Address> {
        match self {
            Self::PoolCreated { pool, .. }
            | Self::Mint { pool, .. }
            | Self::Burn { pool, .. }
            | Self::Swap { pool, .. }
            | Self::Sync { pool, .. } => Some(*pool),
            Self::RouteSwap { .. }
            | Self::FeeRecipientChanged { .. }
            | Self::FeeControllerChanged { .. } => None,
        }
    }
}
