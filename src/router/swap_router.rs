//! Multi-hop quoting and order execution.

use tracing::info;

use crate::domain::{Address, Amount, FeeTier, Route, SwapOrder, SwapSpec};
use crate::error::{AmmError, Result};
use crate::events::Event;
use crate::exchange::Exchange;
use crate::registry::Registry;
use crate::traits::TokenLedger;

use super::quote;

/// Stateless router pricing at a fixed swap fee.
///
/// Holds no reserves of its own: every quote re-reads the pools it
/// crosses, and execution hands each hop's output straight to the next
/// pool.  Obtain one matching an exchange's pools with
/// [`Exchange::router`].
///
/// # Examples
///
/// ```
/// use xyk_amm::domain::{Amount, FeeTier};
/// use xyk_amm::router::Router;
///
/// let router = Router::new(FeeTier::TIER_0_30_PERCENT);
/// let out = router.quote_out(Amount::new(1_000), Amount::new(100_000), Amount::new(100_000));
/// assert_eq!(out, Ok(Amount::new(987)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Router {
    fee: FeeTier,
}

impl Router {
    /// Creates a router pricing at `fee`.
    #[must_use]
    pub const fn new(fee: FeeTier) -> Self {
        Self { fee }
    }

    /// The swap fee used in every quote.
    #[must_use]
    pub const fn fee(&self) -> FeeTier {
        self.fee
    }

    /// Single-hop output quote at this router's fee.
    ///
    /// # Errors
    ///
    /// Same as [`amount_out`](super::amount_out).
    pub fn quote_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount> {
        quote::amount_out(amount_in, reserve_in, reserve_out, self.fee)
    }

    /// Single-hop input quote at this router's fee.
    ///
    /// # Errors
    ///
    /// Same as [`amount_in`](super::amount_in).
    pub fn quote_in(
        &self,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount> {
        quote::amount_in(amount_out, reserve_in, reserve_out, self.fee)
    }

    /// Reserves of the `(a, b)` pool oriented as `(reserve_a, reserve_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidRoute`] if `a == b` or no pool exists.
    pub fn reserves_for(
        &self,
        registry: &Registry,
        a: Address,
        b: Address,
    ) -> Result<(Amount, Amount)> {
        if a == b {
            return Err(AmmError::InvalidRoute);
        }
        registry
            .pool_by_pair(a, b)
            .ok_or(AmmError::InvalidRoute)?
            .oriented_reserves(&a)
    }

    /// Reserves for every hop, validating the whole route first.
    fn hop_reserves(
        &self,
        registry: &Registry,
        route: &Route,
    ) -> Result<Vec<(Amount, Amount)>> {
        route
            .hops()
            .map(|(input, output)| self.reserves_for(registry, input, output))
            .collect()
    }

    /// Amounts at each step of selling `amount_in` along `path`.
    ///
    /// `result[0] == amount_in` and `result[i + 1]` is the output of hop `i`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidRoute`] if `path` has fewer than two assets,
    ///   repeats an asset in consecutive positions, or crosses a pair with
    ///   no pool.
    /// - Any error from [`quote_out`](Self::quote_out) at any hop.
    pub fn quote_route_out(
        &self,
        registry: &Registry,
        amount_in: Amount,
        path: &[Address],
    ) -> Result<Vec<Amount>> {
        let route = Route::new(path.to_vec())?;
        let reserves = self.hop_reserves(registry, &route)?;

        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_in);
        let mut current = amount_in;
        for (reserve_in, reserve_out) in reserves {
            current = self.quote_out(current, reserve_in, reserve_out)?;
            amounts.push(current);
        }
        Ok(amounts)
    }

    /// Amounts at each step of buying `amount_out` at the end of `path`.
    ///
    /// `result[0]` is the required input and the last element is
    /// `amount_out`.
    ///
    /// # Errors
    ///
    /// Same as [`quote_route_out`](Self::quote_route_out), with
    /// [`quote_in`](Self::quote_in) applied from the last hop backwards.
    pub fn quote_route_in(
        &self,
        registry: &Registry,
        amount_out: Amount,
        path: &[Address],
    ) -> Result<Vec<Amount>> {
        let route = Route::new(path.to_vec())?;
        let reserves = self.hop_reserves(registry, &route)?;

        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_out);
        let mut current = amount_out;
        for (reserve_in, reserve_out) in reserves.into_iter().rev() {
            current = self.quote_in(current, reserve_in, reserve_out)?;
            amounts.push(current);
        }
        amounts.reverse();
        Ok(amounts)
    }

    /// Executes `order`, dispatching on its [`SwapSpec`].
    ///
    /// # Errors
    ///
    /// See [`swap_exact_in`](Self::swap_exact_in) and
    /// [`swap_exact_out`](Self::swap_exact_out).
    pub fn swap<L: TokenLedger>(
        &self,
        exchange: &mut Exchange<L>,
        sender: Address,
        order: &SwapOrder,
        now: u64,
    ) -> Result<Vec<Amount>> {
        if order.spec.is_exact_in() {
            self.swap_exact_in(exchange, sender, order, now)
        } else {
            self.swap_exact_out(exchange, sender, order, now)
        }
    }

    /// Sells exactly the order's input along its path.
    ///
    /// Pulls `amounts[0]` from `sender` into the first pool, then swaps hop
    /// by hop, each pool paying the next and the last paying
    /// `order.recipient`.  All hops commit together or not at all.
    ///
    /// # Errors
    ///
    /// In this order:
    ///
    /// - [`AmmError::Expired`] if `now > order.deadline`.
    /// - [`AmmError::InvalidConfiguration`] if the order is exact-output.
    /// - [`AmmError::InvalidRoute`] for a malformed or unpooled path.
    /// - [`AmmError::InsufficientOutputAmount`] if the quoted output is
    ///   below `min_amount_out`.
    /// - Any pool or ledger error raised during execution.
    pub fn swap_exact_in<L: TokenLedger>(
        &self,
        exchange: &mut Exchange<L>,
        sender: Address,
        order: &SwapOrder,
        now: u64,
    ) -> Result<Vec<Amount>> {
        if now > order.deadline {
            return Err(AmmError::Expired);
        }
        let SwapSpec::ExactIn {
            amount_in,
            min_amount_out,
        } = order.spec
        else {
            return Err(AmmError::InvalidConfiguration(
                "exact-input swap given an exact-output order",
            ));
        };
        let amounts = self.quote_route_out(exchange.registry(), amount_in, &order.path)?;
        if amounts.last().copied().unwrap_or_default() < min_amount_out {
            return Err(AmmError::InsufficientOutputAmount);
        }
        self.execute(exchange, sender, order, &amounts, now)?;
        Ok(amounts)
    }

    /// Buys exactly the order's output at the end of its path.
    ///
    /// # Errors
    ///
    /// In this order:
    ///
    /// - [`AmmError::Expired`] if `now > order.deadline`.
    /// - [`AmmError::InvalidConfiguration`] if the order is exact-input.
    /// - [`AmmError::InvalidRoute`] for a malformed or unpooled path.
    /// - [`AmmError::ExcessiveInputAmount`] if the quoted input exceeds
    ///   `max_amount_in`.
    /// - Any pool or ledger error raised during execution.
    pub fn swap_exact_out<L: TokenLedger>(
        &self,
        exchange: &mut Exchange<L>,
        sender: Address,
        order: &SwapOrder,
        now: u64,
    ) -> Result<Vec<Amount>> {
        if now > order.deadline {
            return Err(AmmError::Expired);
        }
        let SwapSpec::ExactOut {
            amount_out,
            max_amount_in,
        } = order.spec
        else {
            return Err(AmmError::InvalidConfiguration(
                "exact-output swap given an exact-input order",
            ));
        };
        let amounts = self.quote_route_in(exchange.registry(), amount_out, &order.path)?;
        if amounts.first().copied().unwrap_or_default() > max_amount_in {
            return Err(AmmError::ExcessiveInputAmount);
        }
        self.execute(exchange, sender, order, &amounts, now)?;
        Ok(amounts)
    }

    /// Moves the quoted amounts through every hop atomically.
    fn execute<L: TokenLedger>(
        &self,
        exchange: &mut Exchange<L>,
        sender: Address,
        order: &SwapOrder,
        amounts: &[Amount],
        now: u64,
    ) -> Result<()> {
        let route = Route::new(order.path.clone())?;
        exchange.atomically(|ex| {
            let pools = route
                .hops()
                .map(|(input, output)| {
                    ex.registry()
                        .get_pool(input, output)
                        .ok_or(AmmError::InvalidRoute)
                })
                .collect::<Result<Vec<_>>>()?;

            let amount_in = amounts.first().copied().unwrap_or_default();
            let first_pool = pools.first().copied().ok_or(AmmError::InvalidRoute)?;
            ex.ledger_mut().transfer(route.first(), sender, first_pool, amount_in)?;

            for (i, ((input, _), pool)) in route.hops().zip(pools.iter().copied()).enumerate() {
                let amount_out = amounts.get(i + 1).copied().ok_or(AmmError::InvalidRoute)?;
                // intermediate output goes straight into the next pool
                let to = pools.get(i + 1).copied().unwrap_or(order.recipient);
                let zero_for_one = ex
                    .registry()
                    .pool(pool)
                    .ok_or(AmmError::PoolNotFound)?
                    .token_pair()
                    .is_token0(&input)?;
                let (amount0_out, amount1_out) = if zero_for_one {
                    (Amount::ZERO, amount_out)
                } else {
                    (amount_out, Amount::ZERO)
                };
                ex.swap_in_place(pool, sender, amount0_out, amount1_out, to, now)?;
            }

            let amount_out = amounts.last().copied().unwrap_or_default();
            info!(
                %sender,
                token_in = %route.first(),
                token_out = %route.last(),
                %amount_in,
                %amount_out,
                hops = route.hop_count(),
                "route swap"
            );
            ex.emit(Event::RouteSwap {
                sender,
                token_in: route.first(),
                token_out: route.last(),
                amount_in,
                amount_out,
                to: order.recipient,
            });
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn token_a() -> Address {
        addr(1)
    }
    fn token_b() -> Address {
        addr(2)
    }
    fn token_c() -> Address {
        addr(3)
    }
    fn alice() -> Address {
        addr(0xA1)
    }

    fn seed(ex: &mut Exchange<InMemoryLedger>, a: Address, ra: u128, b: Address, rb: u128) {
        let Ok(pool) = ex.create_pool(a, b) else {
            panic!("create pool");
        };
        let Ok(()) = ex.ledger_mut().mint(a, pool, Amount::new(ra)) else {
            panic!("fund");
        };
        let Ok(()) = ex.ledger_mut().mint(b, pool, Amount::new(rb)) else {
            panic!("fund");
        };
        let Ok(_) = ex.mint(pool, addr(0x1F), addr(0x1F), 0) else {
            panic!("seed mint");
        };
    }

    /// A/B and B/C at 1000e18 per side; alice holds 10e18 of A.
    fn exchange() -> Exchange<InMemoryLedger> {
        let mut ex = Exchange::new(InMemoryLedger::new(), addr(0xAD));
        seed(&mut ex, token_a(), 1_000 * E18, token_b(), 1_000 * E18);
        seed(&mut ex, token_b(), 1_000 * E18, token_c(), 1_000 * E18);
        let Ok(()) = ex.ledger_mut().mint(token_a(), alice(), Amount::new(10 * E18)) else {
            panic!("fund alice");
        };
        ex
    }

    fn path() -> Vec<Address> {
        vec![token_a(), token_b(), token_c()]
    }

    fn amounts(values: &[u128]) -> Vec<Amount> {
        values.iter().copied().map(Amount::new).collect()
    }

    #[test]
    fn reserves_oriented_by_argument_order() {
        let mut ex = Exchange::new(InMemoryLedger::new(), addr(0xAD));
        // root of the product must clear the 1 000 locked shares
        seed(&mut ex, token_b(), 5_000, token_a(), 20_000);
        let router = ex.router();
        let registry = ex.registry();
        assert_eq!(
            router.reserves_for(registry, token_a(), token_b()),
            Ok((Amount::new(20_000), Amount::new(5_000)))
        );
        assert_eq!(
            router.reserves_for(registry, token_b(), token_a()),
            Ok((Amount::new(5_000), Amount::new(20_000)))
        );
        assert_eq!(
            router.reserves_for(registry, token_a(), token_a()),
            Err(AmmError::InvalidRoute)
        );
        assert_eq!(
            router.reserves_for(registry, token_a(), token_c()),
            Err(AmmError::InvalidRoute)
        );
    }

    #[test]
    fn two_hop_quotes() {
        let ex = exchange();
        let router = ex.router();
        assert_eq!(
            router.quote_route_out(ex.registry(), Amount::new(E18), &path()),
            Ok(amounts(&[E18, 996_006_981_039_903_216, 992_033_851_673_014_362]))
        );
        assert_eq!(
            router.quote_route_in(ex.registry(), Amount::new(E18), &path()),
            Ok(amounts(&[1_008_046_234_113_106_928, 1_004_013_040_121_365_097, E18]))
        );
    }

    #[test]
    fn single_hop_quote_in() {
        let ex = exchange();
        assert_eq!(
            ex.quote_route_in(Amount::new(E18), &[token_a(), token_b()]),
            Ok(amounts(&[1_004_013_040_121_365_097, E18]))
        );
    }

    #[test]
    fn malformed_paths_rejected() {
        let ex = exchange();
        let one = Amount::new(E18);
        for bad in [
            vec![],
            vec![token_a()],
            vec![token_a(), token_a()],
            vec![token_a(), token_b(), token_b()],
            vec![token_a(), token_c()],
        ] {
            assert_eq!(ex.quote_route_out(one, &bad), Err(AmmError::InvalidRoute), "{bad:?}");
            assert_eq!(ex.quote_route_in(one, &bad), Err(AmmError::InvalidRoute), "{bad:?}");
        }
    }

    #[test]
    fn expiry_checked_before_route() {
        let mut ex = exchange();
        let order = SwapOrder::new(
            SwapSpec::exact_in(Amount::new(E18), Amount::ZERO),
            vec![token_a()],
            alice(),
            5,
        );
        assert_eq!(ex.swap_order(alice(), &order, 6), Err(AmmError::Expired));
        assert_eq!(ex.swap_order(alice(), &order, 5), Err(AmmError::InvalidRoute));
    }

    #[test]
    fn mismatched_spec_rejected() {
        let mut ex = exchange();
        let exact_out = SwapOrder::new(
            SwapSpec::exact_out(Amount::new(E18), Amount::MAX),
            path(),
            alice(),
            10,
        );
        assert!(matches!(
            ex.swap_exact_in(alice(), &exact_out, 1),
            Err(AmmError::InvalidConfiguration(_))
        ));
        let exact_in = SwapOrder::new(
            SwapSpec::exact_in(Amount::new(E18), Amount::ZERO),
            path(),
            alice(),
            10,
        );
        assert!(matches!(
            ex.swap_exact_out(alice(), &exact_in, 1),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn slippage_bounds() {
        let mut ex = exchange();
        let greedy = SwapOrder::new(
            SwapSpec::exact_in(Amount::new(E18), Amount::new(992_033_851_673_014_363)),
            path(),
            alice(),
            10,
        );
        assert_eq!(ex.swap_order(alice(), &greedy, 1), Err(AmmError::InsufficientOutputAmount));

        let stingy = SwapOrder::new(
            SwapSpec::exact_out(Amount::new(E18), Amount::new(1_008_046_234_113_106_927)),
            path(),
            alice(),
            10,
        );
        assert_eq!(ex.swap_order(alice(), &stingy, 1), Err(AmmError::ExcessiveInputAmount));
        assert_eq!(ex.ledger().balance_of(token_a(), alice()), Amount::new(10 * E18));
    }

    #[test]
    fn exact_out_delivers_requested_amount() {
        let mut ex = exchange();
        let order = SwapOrder::new(
            SwapSpec::exact_out(Amount::new(E18), Amount::new(1_008_046_234_113_106_928)),
            path(),
            alice(),
            10,
        );
        let Ok(result) = ex.swap_order(alice(), &order, 1) else {
            panic!("exact-out swap");
        };
        assert_eq!(result.first(), Some(&Amount::new(1_008_046_234_113_106_928)));
        assert_eq!(ex.ledger().balance_of(token_c(), alice()), Amount::new(E18));
        assert_eq!(
            ex.ledger().balance_of(token_a(), alice()),
            Amount::new(10 * E18 - 1_008_046_234_113_106_928)
        );
        let Some(Event::RouteSwap {
            amount_in,
            amount_out,
            ..
        }) = ex.events().last()
        else {
            panic!("route event");
        };
        assert_eq!((*amount_in, *amount_out), (result[0], Amount::new(E18)));
    }

    #[test]
    fn recipient_cannot_be_final_pool_token() {
        let mut ex = exchange();
        let before = ex.clone();
        let order = SwapOrder::new(
            SwapSpec::exact_in(Amount::new(E18), Amount::ZERO),
            path(),
            token_c(),
            10,
        );
        assert_eq!(ex.swap_order(alice(), &order, 1), Err(AmmError::InvalidRecipient));
        assert_eq!(ex.ledger(), before.ledger());
        assert_eq!(ex.registry(), before.registry());
    }

    #[test]
    fn sender_without_funds_fails_cleanly() {
        let mut ex = exchange();
        let order = SwapOrder::new(
            SwapSpec::exact_in(Amount::new(E18), Amount::ZERO),
            path(),
            addr(0xB0),
            10,
        );
        assert_eq!(
            ex.swap_order(addr(0xB0), &order, 1),
            Err(AmmError::TransferFailed("insufficient balance"))
        );
    }
}
