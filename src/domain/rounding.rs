//! Direction of an inexact integer division.

/// Which way a division with a remainder goes.
///
/// Rounding always favours the pool: swap outputs, minted shares, and
/// burned amounts round [`Down`](Self::Down); the input required for an
/// exact output rounds [`Up`](Self::Up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Ceiling.
    Up,
    /// Floor.
    Down,
}
