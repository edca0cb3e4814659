//! Constant-product pair pool (Uniswap V2 style).
//!
//! A pool never takes deposit amounts as arguments.  Callers transfer
//! tokens to the pool's address on the ledger first, and every operation
//! infers what arrived by comparing live balances with the stored reserves:
//!
//! | Operation | Infers | Effect |
//! |-----------|--------|--------|
//! | `mint` | `balance − reserve` of both tokens | issues LP shares |
//! | `burn` | LP shares held by the pool itself | returns both tokens |
//! | `swap` | `balance − (reserve − out)` after the transfer out | enforces the invariant |
//! | `sync` | balances | reserves := balances |
//! | `skim` | `balance − reserve` | sends the excess away |
//!
//! # Invariant
//!
//! With `D = 10 000` and fee `f` in basis points, every swap must satisfy
//!
//! ```text
//! (b0·D − in0·f) · (b1·D − in1·f) ≥ r0 · r1 · D²
//! ```
//!
//! so the fee-adjusted product of reserves never decreases.
//!
//! # Commit discipline
//!
//! Each mutating method validates and computes every value before its
//! first side effect.  Ledger transfers that must happen before the final
//! balances are known (burn, swap) can still fail; the owning
//! [`Exchange`](crate::Exchange) rolls those back.

use core::cmp;

use ethnum::U256;
use tracing::{debug, info};

use crate::config::AmmConfig;
use crate::domain::{Address, Amount, Liquidity, Rounding, TokenPair};
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::math::{encode_ratio, isqrt, mul_div, CheckedArithmetic};
use crate::traits::TokenLedger;

/// Largest reserve a pool will record (`2^112 − 1`).
///
/// Keeps the fee-scaled reserve product below 2^256.
pub const MAX_RESERVE: Amount = Amount::new((1u128 << 112) - 1);

/// Snapshot of a pool's reserves and the time they were last written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reserves {
    /// Stored token0 reserve.
    pub reserve0: Amount,
    /// Stored token1 reserve.
    pub reserve1: Amount,
    /// Caller-clock seconds of the last reserve update.
    pub block_timestamp_last: u64,
}

/// What a flash-swap hook is told about the swap in progress.
///
/// By the time the hook runs, `amount0_out` and `amount1_out` already sit
/// in `to`'s balance.  The hook must leave enough input in the pool's
/// balance for the invariant check that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSwap {
    /// The pool being swapped against.
    pub pool: Address,
    /// Caller that requested the swap.
    pub sender: Address,
    /// Receiver of the optimistic output.
    pub to: Address,
    /// Token0 sent out.
    pub amount0_out: Amount,
    /// Token1 sent out.
    pub amount1_out: Amount,
}

/// Everything a pool operation needs from outside the pool.
pub(crate) struct PoolContext<'a, L> {
    pub(crate) ledger: &'a mut L,
    pub(crate) config: &'a AmmConfig,
    pub(crate) fee_recipient: Option<Address>,
    pub(crate) sender: Address,
    pub(crate) now: u64,
    pub(crate) events: &'a mut Vec<Event>,
}

/// A constant-product pool for one canonical pair.
///
/// Created empty by the [`Registry`](crate::registry::Registry); the first
/// mint seeds it.  The pool's [`address`](Self::address) is
/// both the ledger account holding its reserves and the asset id of its
/// LP shares.
///
/// # State
///
/// - `reserve0` / `reserve1`: balances as of the last update
/// - `total_supply`: outstanding LP shares, including the locked minimum
/// - `k_last`: `reserve0 × reserve1` after the last liquidity event while
///   the protocol fee is on, otherwise zero
/// - `price{0,1}_cumulative_last`: time-weighted price sums (wrapping)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    address: Address,
    pair: TokenPair,
    reserve0: Amount,
    reserve1: Amount,
    total_supply: Liquidity,
    k_last: U256,
    price0_cumulative_last: U256,
    price1_cumulative_last: U256,
    block_timestamp_last: u64,
}

impl Pool {
    /// Creates an empty pool.
    pub(crate) const fn new(address: Address, pair: TokenPair) -> Self {
        Self {
            address,
            pair,
            reserve0: Amount::ZERO,
            reserve1: Amount::ZERO,
            total_supply: Liquidity::ZERO,
            k_last: U256::ZERO,
            price0_cumulative_last: U256::ZERO,
            price1_cumulative_last: U256::ZERO,
            block_timestamp_last: 0,
        }
    }

    /// The pool's custody account and LP asset id.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The canonical pair this pool trades.
    #[must_use]
    pub const fn token_pair(&self) -> TokenPair {
        self.pair
    }

    /// The lower-addressed asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.pair.token0()
    }

    /// The higher-addressed asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.pair.token1()
    }

    /// Stored reserves and their timestamp.
    #[must_use]
    pub const fn reserves(&self) -> Reserves {
        Reserves {
            reserve0: self.reserve0,
            reserve1: self.reserve1,
            block_timestamp_last: self.block_timestamp_last,
        }
    }

    /// Stored token0 reserve.
    pub const fn reserve0(&self) -> Amount {
        self.reserve0
    }

    /// Stored token1 reserve.
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }

    /// Returns `(reserve_in, reserve_out)` for a trade selling `asset_in`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidRoute`] if `asset_in` is not in the pair.
    pub fn oriented_reserves(&self, asset_in: &Address) -> Result<(Amount, Amount)> {
        if self.pair.is_token0(asset_in)? {
            Ok((self.reserve0, self.reserve1))
        } else {
            Ok((self.reserve1, self.reserve0))
        }
    }

    /// Outstanding LP shares.
    #[must_use]
    pub const fn total_supply(&self) -> Liquidity {
        self.total_supply
    }

    /// Reserve product recorded at the last liquidity event (zero when the
    /// protocol fee was off).
    #[must_use]
    pub const fn k_last(&self) -> U256 {
        self.k_last
    }

    /// Accumulated `reserve1 / reserve0` price, in fixed point, times seconds.
    #[must_use]
    pub const fn price0_cumulative_last(&self) -> U256 {
        self.price0_cumulative_last
    }

    /// Accumulated `reserve0 / reserve1` price, in fixed point, times seconds.
    #[must_use]
    pub const fn price1_cumulative_last(&self) -> U256 {
        self.price1_cumulative_last
    }

    /// Caller-clock seconds of the last reserve update.
    #[must_use]
    pub const fn block_timestamp_last(&self) -> u64 {
        self.block_timestamp_last
    }

    fn balances<L: TokenLedger>(&self, ledger: &L) -> (Amount, Amount) {
        (
            ledger.balance_of(self.pair.token0(), self.address),
            ledger.balance_of(self.pair.token1(), self.address),
        )
    }

    /// Issues LP shares for whatever was deposited since the last update.
    ///
    /// The protocol fee is settled first, so its shares count toward the
    /// supply used for the deposit ratio.
    ///
    /// - First deposit: `√(amount0 × amount1) − minimum_liquidity`; the
    ///   minimum is minted to [`Address::zero`] and locked for good.
    /// - Later deposits: `min(amount0 × supply / reserve0,
    ///   amount1 × supply / reserve1)`, rounded down.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientInitialLiquidity`] if the first deposit's
    ///   root does not exceed the minimum.
    /// - [`AmmError::ZeroLiquidityMinted`] if a later deposit earns nothing.
    /// - [`AmmError::Overflow`] if a balance exceeds [`MAX_RESERVE`].
    pub(crate) fn mint<L: TokenLedger>(
        &mut self,
        ctx: &mut PoolContext<'_, L>,
        to: Address,
    ) -> Result<Liquidity> {
        let (balance0, balance1) = self.balances(ctx.ledger);
        check_reserve_cap(balance0, balance1)?;
        let amount0 = balance0.safe_sub(&self.reserve0)?;
        let amount1 = balance1.safe_sub(&self.reserve1)?;

        let fee = self.protocol_fee_shares(ctx.config, ctx.fee_recipient)?;
        let supply = self
            .total_supply
            .safe_add(&fee.map_or(Liquidity::ZERO, |(_, minted)| minted))?;

        let (liquidity, locked) = if supply.is_zero() {
            let root = isqrt(amount0.widen().safe_mul(&amount1.widen())?);
            let root = Liquidity::from_wide(root).ok_or(AmmError::Overflow("initial share root"))?;
            let minimum = ctx.config.minimum_liquidity();
            let liquidity = root
                .checked_sub(&minimum)
                .filter(|l| !l.is_zero())
                .ok_or(AmmError::InsufficientInitialLiquidity)?;
            (liquidity, minimum)
        } else {
            let from0 = share_of_deposit(amount0, supply, self.reserve0)?;
            let from1 = share_of_deposit(amount1, supply, self.reserve1)?;
            let liquidity = Liquidity::from_wide(cmp::min(from0, from1))
                .ok_or(AmmError::Overflow("minted shares"))?;
            if liquidity.is_zero() {
                return Err(AmmError::ZeroLiquidityMinted);
            }
            (liquidity, Liquidity::ZERO)
        };
        let new_supply = supply.safe_add(&locked)?.safe_add(&liquidity)?;

        self.settle_protocol_fee(ctx.ledger, fee)?;
        if !locked.is_zero() {
            ctx.ledger.mint(self.address, Address::zero(), shares(locked))?;
        }
        ctx.ledger.mint(self.address, to, shares(liquidity))?;
        self.total_supply = new_supply;
        self.update(ctx, balance0, balance1)?;
        self.record_k_last(ctx.fee_recipient.is_some())?;

        info!(
            pool = %self.address,
            %amount0,
            %amount1,
            %liquidity,
            "liquidity added"
        );
        ctx.events.push(Event::Mint {
            pool: self.address,
            sender: ctx.sender,
            amount0,
            amount1,
            to,
            liquidity,
        });
        Ok(liquidity)
    }

    /// Redeems the LP shares the pool holds on its own address.
    ///
    /// Pays out `liquidity × balance / supply` of each token (rounded down)
    /// to `to`, after settling the protocol fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout is zero.
    /// - [`AmmError::TransferFailed`] if the ledger refuses a payout.
    pub(crate) fn burn<L: TokenLedger>(
        &mut self,
        ctx: &mut PoolContext<'_, L>,
        to: Address,
    ) -> Result<(Amount, Amount)> {
        let (balance0, balance1) = self.balances(ctx.ledger);
        let liquidity = Liquidity::new(ctx.ledger.balance_of(self.address, self.address).get());

        let fee = self.protocol_fee_shares(ctx.config, ctx.fee_recipient)?;
        let supply = self
            .total_supply
            .safe_add(&fee.map_or(Liquidity::ZERO, |(_, minted)| minted))?;
        if supply.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        let amount0 = pro_rata(liquidity, balance0, supply)?;
        let amount1 = pro_rata(liquidity, balance1, supply)?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        let new_supply = supply.safe_sub(&liquidity)?;

        self.settle_protocol_fee(ctx.ledger, fee)?;
        ctx.ledger.burn(self.address, self.address, shares(liquidity))?;
        ctx.ledger
            .transfer(self.pair.token0(), self.address, to, amount0)?;
        ctx.ledger
            .transfer(self.pair.token1(), self.address, to, amount1)?;

        let (balance0, balance1) = self.balances(ctx.ledger);
        self.total_supply = new_supply;
        self.update(ctx, balance0, balance1)?;
        self.record_k_last(ctx.fee_recipient.is_some())?;

        info!(
            pool = %self.address,
            %amount0,
            %amount1,
            %liquidity,
            "liquidity removed"
        );
        ctx.events.push(Event::Burn {
            pool: self.address,
            sender: ctx.sender,
            amount0,
            amount1,
            to,
            liquidity,
        });
        Ok((amount0, amount1))
    }

    /// Sends the requested outputs to `to`, runs `hook`, then checks that
    /// enough input arrived to keep the fee-adjusted invariant.
    ///
    /// Returns the inferred `(amount0_in, amount1_in)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`AmmError::InsufficientOutputLiquidity`] if an output is not
    ///   strictly below its reserve.
    /// - [`AmmError::InvalidRecipient`] if `to` is one of the pair's tokens.
    /// - [`AmmError::InsufficientInputAmount`] if no input arrived.
    /// - [`AmmError::InvariantViolation`] if the input is too small.
    /// - Any error the hook returns.
    pub(crate) fn swap<L, H>(
        &mut self,
        ctx: &mut PoolContext<'_, L>,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        hook: H,
    ) -> Result<(Amount, Amount)>
    where
        L: TokenLedger,
        H: FnOnce(&mut L, &FlashSwap) -> Result<()>,
    {
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        if amount0_out >= self.reserve0 || amount1_out >= self.reserve1 {
            return Err(AmmError::InsufficientOutputLiquidity);
        }
        if self.pair.contains(&to) {
            return Err(AmmError::InvalidRecipient);
        }

        if !amount0_out.is_zero() {
            ctx.ledger
                .transfer(self.pair.token0(), self.address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            ctx.ledger
                .transfer(self.pair.token1(), self.address, to, amount1_out)?;
        }
        hook(
            &mut *ctx.ledger,
            &FlashSwap {
                pool: self.address,
                sender: ctx.sender,
                to,
                amount0_out,
                amount1_out,
            },
        )?;

        let (balance0, balance1) = self.balances(ctx.ledger);
        // outputs are below the reserves, so these cannot underflow
        let amount0_in = balance0.saturating_sub(&self.reserve0.saturating_sub(&amount0_out));
        let amount1_in = balance1.saturating_sub(&self.reserve1.saturating_sub(&amount1_out));
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        check_reserve_cap(balance0, balance1)?;

        let fee = ctx.config.swap_fee();
        let adjusted0 = fee
            .adjusted_balance(balance0, amount0_in)
            .ok_or(AmmError::Overflow("fee-adjusted balance0"))?;
        let adjusted1 = fee
            .adjusted_balance(balance1, amount1_in)
            .ok_or(AmmError::Overflow("fee-adjusted balance1"))?;
        let scale = fee.denominator().safe_mul(&fee.denominator())?;
        let k_before = self
            .reserve0
            .widen()
            .safe_mul(&self.reserve1.widen())?
            .safe_mul(&scale)?;
        if adjusted0.safe_mul(&adjusted1)? < k_before {
            return Err(AmmError::InvariantViolation);
        }

        self.update(ctx, balance0, balance1)?;

        info!(
            pool = %self.address,
            %amount0_in,
            %amount1_in,
            %amount0_out,
            %amount1_out,
            "swap"
        );
        ctx.events.push(Event::Swap {
            pool: self.address,
            sender: ctx.sender,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });
        Ok((amount0_in, amount1_in))
    }

    /// Forces the stored reserves to match the ledger balances.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a balance exceeds [`MAX_RESERVE`].
    pub(crate) fn sync<L: TokenLedger>(&mut self, ctx: &mut PoolContext<'_, L>) -> Result<()> {
        let (balance0, balance1) = self.balances(ctx.ledger);
        self.update(ctx, balance0, balance1)
    }

    /// Sends any balance above the stored reserves to `to`.
    ///
    /// Returns the `(excess0, excess1)` that was sent.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if the ledger refuses a transfer.
    pub(crate) fn skim<L: TokenLedger>(
        &self,
        ledger: &mut L,
        to: Address,
    ) -> Result<(Amount, Amount)> {
        let (balance0, balance1) = self.balances(ledger);
        let excess0 = balance0.saturating_sub(&self.reserve0);
        let excess1 = balance1.saturating_sub(&self.reserve1);
        if !excess0.is_zero() {
            ledger.transfer(self.pair.token0(), self.address, to, excess0)?;
        }
        if !excess1.is_zero() {
            ledger.transfer(self.pair.token1(), self.address, to, excess1)?;
        }
        debug!(pool = %self.address, %excess0, %excess1, "skimmed");
        Ok((excess0, excess1))
    }

    /// Shares owed to the fee recipient for `√k` growth since `k_last`.
    ///
    /// `supply × (√k − √k_last) / (√k × (d − 1) + √k_last)`, which gives
    /// the recipient `1/d` of the growth.
    fn protocol_fee_shares(
        &self,
        config: &AmmConfig,
        fee_recipient: Option<Address>,
    ) -> Result<Option<(Address, Liquidity)>> {
        let Some(recipient) = fee_recipient else {
            return Ok(None);
        };
        if self.k_last == U256::ZERO {
            return Ok(None);
        }
        let root_k = isqrt(self.reserve0.widen().safe_mul(&self.reserve1.widen())?);
        let root_k_last = isqrt(self.k_last);
        if root_k <= root_k_last {
            return Ok(None);
        }
        let numerator = self
            .total_supply
            .widen()
            .safe_mul(&root_k.safe_sub(&root_k_last)?)?;
        let weight = U256::new(u128::from(config.protocol_fee_divisor().saturating_sub(1)));
        let denominator = root_k.safe_mul(&weight)?.safe_add(&root_k_last)?;
        let minted = numerator.safe_div(&denominator, Rounding::Down)?;
        let minted = Liquidity::from_wide(minted).ok_or(AmmError::Overflow("protocol fee shares"))?;
        Ok((!minted.is_zero()).then_some((recipient, minted)))
    }

    fn settle_protocol_fee<L: TokenLedger>(
        &self,
        ledger: &mut L,
        fee: Option<(Address, Liquidity)>,
    ) -> Result<()> {
        if let Some((recipient, minted)) = fee {
            ledger.mint(self.address, recipient, shares(minted))?;
            debug!(pool = %self.address, %recipient, %minted, "protocol fee minted");
        }
        Ok(())
    }

    fn record_k_last(&mut self, fee_on: bool) -> Result<()> {
        self.k_last = if fee_on {
            self.reserve0.widen().safe_mul(&self.reserve1.widen())?
        } else {
            U256::ZERO
        };
        Ok(())
    }

    /// Writes new reserves, folding the old ones into the accumulators.
    fn update<L>(
        &mut self,
        ctx: &mut PoolContext<'_, L>,
        balance0: Amount,
        balance1: Amount,
    ) -> Result<()> {
        check_reserve_cap(balance0, balance1)?;
        self.accumulate_prices(ctx.config.price_resolution_bits(), ctx.now);
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        debug!(pool = %self.address, reserve0 = %balance0, reserve1 = %balance1, "sync");
        ctx.events.push(Event::Sync {
            pool: self.address,
            reserve0: balance0,
            reserve1: balance1,
        });
        Ok(())
    }

    fn accumulate_prices(&mut self, resolution_bits: u32, now: u64) {
        // a clock that runs backwards accrues nothing
        let elapsed = now.saturating_sub(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve0.is_zero() && !self.reserve1.is_zero() {
            let dt = U256::new(u128::from(elapsed));
            let (r0, r1) = (self.reserve0.get(), self.reserve1.get());
            if let Some(price0) = encode_ratio(r1, r0, resolution_bits) {
                self.price0_cumulative_last = self
                    .price0_cumulative_last
                    .wrapping_add(price0.wrapping_mul(dt));
            }
            if let Some(price1) = encode_ratio(r0, r1, resolution_bits) {
                self.price1_cumulative_last = self
                    .price1_cumulative_last
                    .wrapping_add(price1.wrapping_mul(dt));
            }
        }
        self.block_timestamp_last = cmp::max(self.block_timestamp_last, now);
    }
}

fn check_reserve_cap(balance0: Amount, balance1: Amount) -> Result<()> {
    if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
        return Err(AmmError::Overflow("reserve above 112-bit cap"));
    }
    Ok(())
}

/// `amount × supply / reserve`, rounded down, kept wide for the `min`.
fn share_of_deposit(amount: Amount, supply: Liquidity, reserve: Amount) -> Result<U256> {
    mul_div(amount.widen(), supply.widen(), reserve.widen(), Rounding::Down)
        .ok_or(AmmError::DivisionByZero)
}

/// `liquidity × balance / supply`, rounded down.
fn pro_rata(liquidity: Liquidity, balance: Amount, supply: Liquidity) -> Result<Amount> {
    let wide = mul_div(liquidity.widen(), balance.widen(), supply.widen(), Rounding::Down)
        .ok_or(AmmError::DivisionByZero)?;
    Amount::from_wide(wide).ok_or(AmmError::Overflow("burn payout"))
}

/// LP shares as a ledger amount of the pool's own asset.
const fn shares(liquidity: Liquidity) -> Amount {
    Amount::new(liquidity.get())
}
