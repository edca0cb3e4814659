//! Router swap requests: the amount constraint, the route, and the order.

use core::fmt;

use super::{Address, Amount};
use crate::error::AmmError;

/// The amount constraint driving a routed swap, with its slippage bound.
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::{Amount, SwapSpec};
///
/// let spec = SwapSpec::exact_in(Amount::new(1_000), Amount::new(990));
/// assert!(spec.is_exact_in());
/// assert_eq!(spec.amount(), Amount::new(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapSpec {
    /// Sell exactly `amount_in`; fail if the output is below `min_amount_out`.
    ExactIn {
        /// The fixed input amount.
        amount_in: Amount,
        /// The smallest acceptable final output.
        min_amount_out: Amount,
    },
    /// Buy exactly `amount_out`; fail if the input exceeds `max_amount_in`.
    ExactOut {
        /// The desired final output.
        amount_out: Amount,
        /// The largest acceptable input.
        max_amount_in: Amount,
    },
}

impl SwapSpec {
    /// Creates an exact-input specification.
    pub const fn exact_in(amount_in: Amount, min_amount_out: Amount) -> Self {
        Self::ExactIn {
            amount_in,
            min_amount_out,
        }
    }

    /// Creates an exact-output specification.
    pub const fn exact_out(amount_out: Amount, max_amount_in: Amount) -> Self {
        Self::ExactOut {
            amount_out,
            max_amount_in,
        }
    }

    /// Returns `true` if this is an exact-input specification.
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn { .. })
    }

    /// Returns the fixed side of the trade.
    pub const fn amount(&self) -> Amount {
        match self {
            Self::ExactIn { amount_in, .. } => *amount_in,
            Self::ExactOut { amount_out, .. } => *amount_out,
        }
    }
}

impl fmt::Display for SwapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn {
                amount_in,
                min_amount_out,
            } => write!(f, "ExactIn({amount_in}, min_out={min_amount_out})"),
            Self::ExactOut {
                amount_out,
                max_amount_in,
            } => write!(f, "ExactOut({amount_out}, max_in={max_amount_in})"),
        }
    }
}

/// An ordered chain of at least two assets; each adjacent pair is one hop.
///
/// Construction only checks the length.  Whether every hop has a pool is
/// decided against live registry state by the router.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Address>", into = "Vec<Address>")
)]
pub struct Route(Vec<Address>);

impl Route {
    /// Creates a route.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidRoute`] if fewer than two assets are given.
    pub fn new(path: Vec<Address>) -> Result<Self, AmmError> {
        if path.len() < 2 {
            return Err(AmmError::InvalidRoute);
        }
        Ok(Self(path))
    }

    /// The assets in order.
    #[must_use]
    pub fn assets(&self) -> &[Address] {
        &self.0
    }

    /// Number of hops (always `assets().len() - 1`).
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Iterates over `(input, output)` asset pairs, first hop first.
    pub fn hops(&self) -> impl DoubleEndedIterator<Item = (Address, Address)> + '_ {
        self.0.windows(2).filter_map(|w| match w {
            [a, b] => Some((*a, *b)),
            _ => None,
        })
    }

    /// The asset sold into the first hop.
    #[must_use]
    pub fn first(&self) -> Address {
        self.0.first().copied().unwrap_or_default()
    }

    /// The asset received from the last hop.
    #[must_use]
    pub fn last(&self) -> Address {
        self.0.last().copied().unwrap_or_default()
    }
}

impl TryFrom<Vec<Address>> for Route {
    type Error = AmmError;

    fn try_from(path: Vec<Address>) -> Result<Self, AmmError> {
        Self::new(path)
    }
}

impl From<Route> for Vec<Address> {
    fn from(route: Route) -> Self {
        route.0
    }
}

/// A complete routed-swap request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapOrder {
    /// Amount constraint and slippage bound.
    pub spec: SwapSpec,
    /// Assets to trade through, first to last.  Validated by the router.
    pub path: Vec<Address>,
    /// Receiver of the final output.
    pub recipient: Address,
    /// Latest acceptable execution time (inclusive), in caller clock seconds.
    pub deadline: u64,
}

impl SwapOrder {
    /// Creates an order.
    #[must_use]
    pub fn new(spec: SwapSpec, path: Vec<Address>, recipient: Address, deadline: u64) -> Self {
        Self {
            spec,
            path,
            recipient,
            deadline,
        }
    }
}
