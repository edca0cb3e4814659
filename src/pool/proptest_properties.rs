//! Property-based tests for the pair pool.
//!
//! 1. **Round trip** A→B→A returns no more than was sold.
//! 2. **Invariant** `reserve0 × reserve1` never decreases across a swap.
//! 3. **Quote tightness**: the quoted output is accepted, one more unit is
//!    rejected.
//! 4. **Liquidity conservation**: deposit then withdraw returns no more than
//!    was deposited and restores the share supply.
//! 5. **Quote consistency**: the input quoted for an output buys at least
//!    that output.

use ethnum::U256;
use proptest::prelude::*;

use crate::domain::{Address, Amount, FeeTier, SwapOrder, SwapSpec};
use crate::error::AmmError;
use crate::exchange::Exchange;
use crate::ledger::InMemoryLedger;
use crate::router::{amount_in, amount_out};
use crate::traits::TokenLedger;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn token_a() -> Address {
    Address::from_bytes([1u8; 32])
}

fn token_b() -> Address {
    Address::from_bytes([2u8; 32])
}

fn provider() -> Address {
    Address::from_bytes([0x1F; 32])
}

fn trader() -> Address {
    Address::from_bytes([0x7A; 32])
}

fn fee_30bp() -> FeeTier {
    FeeTier::TIER_0_30_PERCENT
}

/// Exchange with one A/B pool seeded at `(ra, rb)`.
fn seeded(ra: u128, rb: u128) -> (Exchange<InMemoryLedger>, Address) {
    let mut ex = Exchange::new(InMemoryLedger::new(), provider());
    let Ok(pool) = ex.create_pool(token_a(), token_b()) else {
        panic!("create pool");
    };
    let Ok(()) = ex.ledger_mut().mint(token_a(), pool, Amount::new(ra)) else {
        panic!("fund a");
    };
    let Ok(()) = ex.ledger_mut().mint(token_b(), pool, Amount::new(rb)) else {
        panic!("fund b");
    };
    let Ok(_) = ex.mint(pool, provider(), provider(), 0) else {
        panic!("seed mint");
    };
    (ex, pool)
}

/// Funds the trader and sells `amount` of `token_in` for the other token.
fn sell(
    ex: &mut Exchange<InMemoryLedger>,
    token_in: Address,
    amount: u128,
) -> Result<Amount, AmmError> {
    let token_out = if token_in == token_a() { token_b() } else { token_a() };
    ex.ledger_mut().mint(token_in, trader(), Amount::new(amount))?;
    let order = SwapOrder::new(
        SwapSpec::exact_in(Amount::new(amount), Amount::ZERO),
        vec![token_in, token_out],
        trader(),
        u64::MAX,
    );
    let amounts = ex.swap_order(trader(), &order, 1)?;
    Ok(amounts.last().copied().unwrap_or_default())
}

fn product(ex: &Exchange<InMemoryLedger>, pool: Address) -> U256 {
    let Some(p) = ex.pool(pool) else {
        panic!("pool exists");
    };
    p.reserve0().widen() * p.reserve1().widen()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves in [10_000, 10^15]; the lower bound keeps the first deposit
/// above the locked minimum.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=1_000_000_000_000_000u128
}

/// Trade size as a per-mille fraction of a reserve, in [1, 500].
fn fraction_strategy() -> impl Strategy<Value = u128> {
    1u128..=500u128
}

// ---------------------------------------------------------------------------
// Property 1: Round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_loses_value(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (mut ex, _) = seeded(ra, rb);
        let swap_in = (ra * frac / 1_000).max(1);

        let Ok(received_b) = sell(&mut ex, token_a(), swap_in) else {
            return Ok(());
        };
        if received_b.is_zero() { return Ok(()); }
        let Ok(final_a) = sell(&mut ex, token_b(), received_b.get()) else {
            return Ok(());
        };

        prop_assert!(
            final_a.get() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            final_a, swap_in
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Invariant preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_product_never_decreases(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
        a_to_b in any::<bool>(),
    ) {
        let (mut ex, pool) = seeded(ra, rb);
        let k_before = product(&ex, pool);
        let (token_in, reserve) = if a_to_b { (token_a(), ra) } else { (token_b(), rb) };

        if sell(&mut ex, token_in, (reserve * frac / 1_000).max(1)).is_err() {
            return Ok(());
        }
        let k_after = product(&ex, pool);
        prop_assert!(k_after >= k_before, "k decreased: {} -> {}", k_before, k_after);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Quote tightness
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quoted_output_is_the_maximum(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (mut ex, pool) = seeded(ra, rb);
        let deposit = Amount::new((ra * frac / 1_000).max(1));
        let Ok(out) = amount_out(deposit, Amount::new(ra), Amount::new(rb), fee_30bp()) else {
            return Ok(());
        };
        if out.is_zero() || out.get() + 1 >= rb { return Ok(()); }

        let Ok(()) = ex.ledger_mut().mint(token_a(), pool, deposit) else {
            panic!("deposit");
        };
        let one_more = Amount::new(out.get() + 1);
        let greedy = ex.swap(pool, trader(), Amount::ZERO, one_more, trader(), 1);
        prop_assert_eq!(greedy, Err(AmmError::InvariantViolation));

        let exact = ex.swap(pool, trader(), Amount::ZERO, out, trader(), 1);
        prop_assert_eq!(exact, Ok((deposit, Amount::ZERO)));
    }
}

// ---------------------------------------------------------------------------
// Property 4: Liquidity conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deposit_withdraw_conserves(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (mut ex, pool) = seeded(ra, rb);
        let Some(supply_before) = ex.pool(pool).map(|p| p.total_supply()) else {
            panic!("pool exists");
        };
        let (d0, d1) = (ra * frac / 1_000, rb * frac / 1_000);
        let Ok(()) = ex.ledger_mut().mint(token_a(), pool, Amount::new(d0)) else {
            panic!("deposit");
        };
        let Ok(()) = ex.ledger_mut().mint(token_b(), pool, Amount::new(d1)) else {
            panic!("deposit");
        };
        let Ok(shares) = ex.mint(pool, trader(), trader(), 1) else {
            return Ok(());
        };

        let returned = ex.ledger_mut().transfer(pool, trader(), pool, Amount::new(shares.get()));
        prop_assert_eq!(returned, Ok(()));
        let Ok((out0, out1)) = ex.burn(pool, trader(), trader(), 2) else {
            return Ok(());
        };

        prop_assert!(out0.get() <= d0, "token0 gained: {} > {}", out0, d0);
        prop_assert!(out1.get() <= d1, "token1 gained: {} > {}", out1, d1);
        let Some(supply_after) = ex.pool(pool).map(|p| p.total_supply()) else {
            panic!("pool exists");
        };
        prop_assert_eq!(supply_after, supply_before);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Quote consistency
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quoted_input_buys_output(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let (reserve_in, reserve_out) = (Amount::new(ra), Amount::new(rb));
        let wanted = Amount::new((rb * frac / 1_000).max(1));
        let Ok(needed) = amount_in(wanted, reserve_in, reserve_out, fee_30bp()) else {
            return Ok(());
        };
        let Ok(bought) = amount_out(needed, reserve_in, reserve_out, fee_30bp()) else {
            return Ok(());
        };
        prop_assert!(bought >= wanted, "paid {} for {} < {}", needed, bought, wanted);
    }
}
