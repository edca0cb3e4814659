//! Unified error types for the AMM engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type, so a caller can match on a single enum regardless of whether
//! the failure came from a pool, the registry, the router, or the token
//! ledger.
//!
//! # Categories
//!
//! | Category | Variants | Effect |
//! |----------|----------|--------|
//! | Input validation | [`IdenticalAssets`](AmmError::IdenticalAssets), [`ZeroAsset`](AmmError::ZeroAsset), [`InvalidRoute`](AmmError::InvalidRoute), [`Expired`](AmmError::Expired), [`InvalidRecipient`](AmmError::InvalidRecipient) | rejected before any state change |
//! | Economic | [`InvariantViolation`](AmmError::InvariantViolation), [`InsufficientOutputAmount`](AmmError::InsufficientOutputAmount), [`ExcessiveInputAmount`](AmmError::ExcessiveInputAmount), `Insufficient*` | whole call rolled back |
//! | Authorization | [`Unauthorized`](AmmError::Unauthorized) | rejected, no state change |
//! | Collaborator | [`TransferFailed`](AmmError::TransferFailed) | whole call rolled back |
//!
//! Nothing is retried internally; retry policy belongs to the caller.

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    // -- input validation ---------------------------------------------------
    /// Both sides of a pair are the same asset.
    #[error("identical assets")]
    IdenticalAssets,

    /// An asset identifier is the null address.
    #[error("zero asset address")]
    ZeroAsset,

    /// Route has fewer than two assets or names a pair with no pool.
    #[error("invalid route")]
    InvalidRoute,

    /// The caller-supplied deadline has passed.
    #[error("deadline expired")]
    Expired,

    /// Swap output directed at one of the pool's own tokens.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// Configuration parameter out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // -- registry -----------------------------------------------------------
    /// A pool for the pair already exists.
    #[error("pool exists")]
    PoolExists,

    /// No pool is registered under the given address or pair.
    #[error("pool not found")]
    PoolNotFound,

    /// Enumeration index past the number of pools.
    #[error("index {index} out of range for {len} pools")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of pools at the time of the call.
        len: usize,
    },

    // -- authorization ------------------------------------------------------
    /// Caller is not the fee controller.
    #[error("unauthorized")]
    Unauthorized,

    // -- economic -----------------------------------------------------------
    /// First deposit too small to cover the locked minimum liquidity.
    #[error("insufficient initial liquidity")]
    InsufficientInitialLiquidity,

    /// Deposit would mint zero shares.
    #[error("zero liquidity minted")]
    ZeroLiquidityMinted,

    /// Burn would return zero of at least one token.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Requested swap output is not strictly below the reserve.
    #[error("insufficient liquidity for output")]
    InsufficientOutputLiquidity,

    /// No input reached the pool, or a quote was asked for zero input.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Output is zero or below the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// Required input exceeds the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// Reserves cannot support the quote.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Fee-adjusted reserve product decreased.
    #[error("constant-product invariant violated")]
    InvariantViolation,

    // -- collaborator -------------------------------------------------------
    /// The token ledger refused a transfer, mint, or burn.
    #[error("transfer failed: {0}")]
    TransferFailed(&'static str),

    // -- arithmetic ---------------------------------------------------------
    /// Arithmetic overflow, or a reserve above the 112-bit cap.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    // -- host ---------------------------------------------------------------
    /// A thread panicked while holding the shared exchange lock.
    #[error("exchange lock poisoned")]
    LockPoisoned,
}

impl AmmError {
    /// Returns `true` for failures caused by malformed caller input.
    ///
    /// These are rejected before any state is touched and can be retried
    /// with corrected arguments.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::IdenticalAssets
                | Self::ZeroAsset
                | Self::InvalidRoute
                | Self::Expired
                | Self::InvalidRecipient
                | Self::InvalidConfiguration(_)
        )
    }

    /// Returns `true` for economic or invariant rejections.
    #[must_use]
    pub const fn is_economic(&self) -> bool {
        matches!(
            self,
            Self::InsufficientInitialLiquidity
                | Self::ZeroLiquidityMinted
                | Self::InsufficientLiquidityBurned
                | Self::InsufficientOutputLiquidity
                | Self::InsufficientInputAmount
                | Self::InsufficientOutputAmount
                | Self::ExcessiveInputAmount
                | Self::InsufficientLiquidity
                | Self::InvariantViolation
        )
    }
}
