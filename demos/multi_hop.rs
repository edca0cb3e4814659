//! Multi-hop routing example.
//!
//! Opens USDC/WETH and WETH/DAI pools, quotes a USDC → WETH → DAI route in
//! both directions, executes it, and shows what the protocol fee earns.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=xyk_amm=debug cargo run --example multi_hop
//! ```

use tracing_subscriber::EnvFilter;
use xyk_amm::domain::{Address, Amount, SwapOrder, SwapSpec};
use xyk_amm::ledger::InMemoryLedger;
use xyk_amm::traits::TokenLedger;
use xyk_amm::Exchange;

const E18: u128 = 1_000_000_000_000_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Multi-hop routing (x · y = k) ===\n");

    // ── 1. Accounts and assets ──────────────────────────────────────────
    let admin = Address::from_bytes([0xAD; 32]);
    let treasury = Address::from_bytes([0xFE; 32]);
    let provider = Address::from_bytes([0x1F; 32]);
    let trader = Address::from_bytes([0x7A; 32]);
    let usdc = Address::from_bytes([1u8; 32]);
    let weth = Address::from_bytes([2u8; 32]);
    let dai = Address::from_bytes([3u8; 32]);

    let mut ex = Exchange::new(InMemoryLedger::new(), admin);
    ex.set_fee_recipient(admin, Some(treasury))?;

    // ── 2. Open two pools ───────────────────────────────────────────────
    for (a, b) in [(usdc, weth), (weth, dai)] {
        let pool = ex.create_pool(a, b)?;
        ex.ledger_mut().mint(a, pool, Amount::new(1_000 * E18))?;
        ex.ledger_mut().mint(b, pool, Amount::new(1_000 * E18))?;
        let shares = ex.mint(pool, provider, provider, 0)?;
        println!("Pool {pool}: {shares} LP shares to provider");
    }

    // ── 3. Quote the route both ways ────────────────────────────────────
    let path = vec![usdc, weth, dai];
    let forward = ex.quote_route_out(Amount::new(E18), &path)?;
    println!("\nSell 1 USDC  → amounts {forward:?}");
    let backward = ex.quote_route_in(Amount::new(E18), &path)?;
    println!("Buy 1 DAI    ← amounts {backward:?}");

    // ── 4. Execute with a 1% slippage bound ─────────────────────────────
    ex.ledger_mut().mint(usdc, trader, Amount::new(E18))?;
    let quoted = forward.last().copied().unwrap_or_default();
    let min_out = Amount::new(quoted.get() / 100 * 99);
    let order = SwapOrder::new(SwapSpec::exact_in(Amount::new(E18), min_out), path, trader, 60);
    let executed = ex.swap_order(trader, &order, 1)?;
    println!("\nExecuted: {executed:?}");
    println!("Trader DAI balance: {}", ex.ledger().balance_of(dai, trader));

    // ── 5. Protocol fee realised on withdrawal ──────────────────────────
    let Some(first) = ex.registry().get_pool(usdc, weth) else {
        return Err("usdc/weth pool missing".into());
    };
    let shares = ex.ledger().balance_of(first, provider);
    ex.ledger_mut().transfer(first, provider, first, shares)?;
    let (out0, out1) = ex.burn(first, provider, provider, 2)?;
    println!("\nProvider withdrew {out0} USDC and {out1} WETH");
    println!("Treasury LP shares: {}", ex.ledger().balance_of(first, treasury));

    // ── 6. Event log ────────────────────────────────────────────────────
    println!("\n{} events recorded:", ex.events().len());
    for event in ex.take_events() {
        println!("  {event:?}");
    }

    Ok(())
}
