//! Batching all orders of a token pair through one constant product pool.
//!
//! All orders of the pair are executed at a single uniform price. When one
//! token is sold in excess, the excess is swapped through the pool and the
//! clearing price is the effective exchange rate of that swap. Otherwise the
//! orders clear among themselves at the pool's spot price.

use {
    super::Budget,
    crate::domain::{
        auction,
        eth,
        liquidity::{self, constant_product},
        order,
        settlement,
        solution::{Candidate, ClearingPrices, Interaction, Trade},
    },
    num::{BigInt, BigRational, One, Signed, Zero},
    number::u256_ext::U256Ext,
    std::collections::BTreeMap,
};

/// Extra amounts tried on top of the balancing pool output when integer
/// rounding leaves the settlement short.
const MARGINS: [u64; 14] = [0, 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

/// Proposes one candidate per token pair with at least two orders.
pub fn candidates(
    auction: &auction::Auction,
    builder: &settlement::Builder,
    budget: &Budget,
) -> Vec<Candidate> {
    let mut pairs = BTreeMap::<_, Vec<&order::Order>>::new();
    for order in &auction.orders {
        let pair = if order.sell.token < order.buy.token {
            (order.sell.token, order.buy.token)
        } else {
            (order.buy.token, order.sell.token)
        };
        pairs.entry(pair).or_default().push(order);
    }

    let mut candidates = Vec::new();
    for ((a, b), orders) in pairs {
        if budget.exhausted() {
            break;
        }
        if orders.len() < 2 {
            continue;
        }
        let Some((liquidity, pool)) = deepest(&auction.liquidity, a, b) else {
            continue;
        };
        if let Some(candidate) = solve(builder, orders, liquidity, pool, budget) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// The constant product pool with the largest invariant for the pair.
fn deepest(
    liquidity: &[liquidity::Liquidity],
    a: eth::TokenAddress,
    b: eth::TokenAddress,
) -> Option<(&liquidity::Liquidity, &constant_product::Pool)> {
    let mut deepest: Option<(&liquidity::Liquidity, &constant_product::Pool)> = None;
    for source in liquidity {
        let liquidity::State::ConstantProduct(pool) = &source.state else {
            continue;
        };
        let (x, y) = pool.reserves.get();
        if (x.token, y.token) != (a, b) {
            continue;
        }
        if deepest.is_none_or(|(_, best)| pool.reserves.k() > best.reserves.k()) {
            deepest = Some((source, pool));
        }
    }
    deepest
}

#[derive(Debug, Clone)]
struct TokenContext {
    token: eth::TokenAddress,
    reserve: BigInt,
    buy_volume: BigInt,
    sell_volume: BigInt,
}

impl TokenContext {
    fn net(&self) -> BigInt {
        &self.sell_volume - &self.buy_volume
    }

    fn is_excess_after_fees(&self, deficit: &TokenContext, fee: &BigRational) -> bool {
        let (numer, denom) = (fee.numer(), fee.denom());
        denom * &self.reserve * deficit.net() < (denom - numer) * &deficit.reserve * self.net()
    }

    fn is_excess_before_fees(&self, deficit: &TokenContext) -> bool {
        &self.reserve * deficit.net() < &deficit.reserve * self.net()
    }
}

fn solve(
    builder: &settlement::Builder,
    mut orders: Vec<&order::Order>,
    liquidity: &liquidity::Liquidity,
    pool: &constant_product::Pool,
    budget: &Budget,
) -> Option<Candidate> {
    while !orders.is_empty() && !budget.exhausted() {
        let (context_a, context_b) = split_into_contexts(&orders, pool)?;
        let candidate =
            solve_orders(builder, &orders, liquidity, pool, &context_a, &context_b);
        if candidate.is_some() {
            return candidate;
        }

        // Remove the order with the worst limit price that is selling the
        // excess token and try again.
        let excess = if context_a.is_excess_before_fees(&context_b) {
            context_a.token
        } else {
            context_b.token
        };
        let worst = orders
            .iter()
            .enumerate()
            .filter(|(_, order)| order.sell.token == excess)
            .max_by(|(_, lhs), (_, rhs)| {
                (lhs.buy.amount.to_big_int() * rhs.sell.amount.to_big_int())
                    .cmp(&(lhs.sell.amount.to_big_int() * rhs.buy.amount.to_big_int()))
            })
            .map(|(index, _)| index)?;
        tracing::trace!(order = %orders[worst].uid, "removing order from batch");
        orders.remove(worst);
    }
    None
}

fn solve_orders(
    builder: &settlement::Builder,
    orders: &[&order::Order],
    liquidity: &liquidity::Liquidity,
    pool: &constant_product::Pool,
    context_a: &TokenContext,
    context_b: &TokenContext,
) -> Option<Candidate> {
    let candidate = if context_a.is_excess_after_fees(context_b, &pool.fee) {
        solve_with_pool(builder, orders, liquidity, pool, context_b, context_a)
    } else if context_b.is_excess_after_fees(context_a, &pool.fee) {
        solve_with_pool(builder, orders, liquidity, pool, context_a, context_b)
    } else {
        solve_without_pool(orders, context_a, context_b)
    }?;
    builder.build(&candidate).is_ok().then_some(candidate)
}

/// Clears the orders at the current spot price of the pool without using any
/// of its liquidity.
fn solve_without_pool(
    orders: &[&order::Order],
    context_a: &TokenContext,
    context_b: &TokenContext,
) -> Option<Candidate> {
    let prices = ClearingPrices::new([
        (context_a.token, eth::U256::from_big_int(&context_b.reserve).ok()?),
        (context_b.token, eth::U256::from_big_int(&context_a.reserve).ok()?),
    ]);
    let trades = fill(orders, &prices)?;
    Some(Candidate {
        prices,
        trades,
        interactions: Vec::new(),
    })
}

/// Swaps the excess through the pool. The clearing price is the effective
/// exchange rate of the swap that exactly balances supply and demand.
fn solve_with_pool(
    builder: &settlement::Builder,
    orders: &[&order::Order],
    liquidity: &liquidity::Liquidity,
    pool: &constant_product::Pool,
    shortage: &TokenContext,
    excess: &TokenContext,
) -> Option<Candidate> {
    let out = compute_pool_out(shortage, excess, &pool.fee)?;
    if !out.is_positive() {
        return None;
    }
    let out = eth::U256::from_big_rational(&out).ok()?;

    for margin in MARGINS {
        let Some(amount) = out.checked_add(eth::U256::from(margin)) else {
            break;
        };
        let Ok(rate) = pool.exact_out(
            eth::Asset {
                token: shortage.token,
                amount,
            },
            excess.token,
        ) else {
            break;
        };
        let prices = ClearingPrices::new([
            (excess.token, amount),
            (shortage.token, rate.input.amount),
        ]);
        let Some(trades) = fill(orders, &prices) else {
            continue;
        };

        let mut candidate = Candidate {
            prices,
            trades,
            interactions: Vec::new(),
        };
        // Because the settlement rounds in favour of the traders, the orders
        // may need slightly more or less than the balancing amount.
        let needed = needed(&candidate.trades, shortage.token);
        if needed.is_positive() {
            let Ok(needed) = eth::U256::from_big_int(&needed) else {
                break;
            };
            let Ok(swap) = pool.exact_out(
                eth::Asset {
                    token: shortage.token,
                    amount: needed,
                },
                excess.token,
            ) else {
                continue;
            };
            candidate
                .interactions
                .push(Interaction::from_quote(liquidity.id.clone(), &swap));
        }
        if builder.build(&candidate).is_ok() {
            return Some(candidate);
        }
    }
    None
}

/// Fully executes all orders at the given prices.
fn fill(orders: &[&order::Order], prices: &ClearingPrices) -> Option<Vec<Trade>> {
    orders
        .iter()
        .map(|order| Trade::fill((*order).clone(), prices))
        .collect()
}

/// The amount of `token` the trades pay out beyond what they bring in.
fn needed(trades: &[Trade], token: eth::TokenAddress) -> BigInt {
    trades.iter().fold(BigInt::zero(), |total, trade| {
        if trade.order.sell.token == token {
            total - trade.sell.to_big_int() - trade.fee().to_big_int()
        } else {
            total + trade.buy.to_big_int()
        }
    })
}

fn split_into_contexts(
    orders: &[&order::Order],
    pool: &constant_product::Pool,
) -> Option<(TokenContext, TokenContext)> {
    let (a, b) = pool.reserves.get();
    let mut contexts = [a, b].map(|reserve| TokenContext {
        token: reserve.token,
        reserve: reserve.amount.to_big_int(),
        buy_volume: BigInt::zero(),
        sell_volume: BigInt::zero(),
    });
    for order in orders {
        for context in &mut contexts {
            if order.side == order::Side::Buy && context.token == order.buy.token {
                context.buy_volume += order.buy.amount.to_big_int();
            }
            if order.side == order::Side::Sell && context.token == order.sell.token {
                context.sell_volume += order.sell.amount.to_big_int();
            }
        }
        if !contexts.iter().any(|context| context.token == order.sell.token)
            || !contexts.iter().any(|context| context.token == order.buy.token)
        {
            return None;
        }
    }
    let [a, b] = contexts;
    Some((a, b))
}

/// Computes the exact amount of the shortage token that has to be taken from
/// the pool to perfectly match demand and supply at the effective exchange
/// rate of the swap.
fn compute_pool_out(
    shortage: &TokenContext,
    excess: &TokenContext,
    fee: &BigRational,
) -> Option<BigRational> {
    let remaining = BigRational::one() - fee;
    let (numer, denom) = (remaining.numer(), remaining.denom());
    let numerator_minuend = numer * excess.net() * &shortage.reserve;
    let numerator_subtrahend = denom * shortage.net() * &excess.reserve;
    let denominator = denom * &excess.reserve + numer * excess.net();
    if denominator.is_zero() {
        return None;
    }
    Some(BigRational::new(
        numerator_minuend - numerator_subtrahend,
        denominator,
    ))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::order::{
            Side,
            tests::{order, token},
        },
        crate::domain::settlement::tests::auction,
    };

    fn to_wei(base: u64) -> u64 {
        base * 1_000_000_000
    }

    fn pool(reserve_a: u64, reserve_b: u64) -> liquidity::Liquidity {
        liquidity::Liquidity {
            id: liquidity::Id("0".to_owned()),
            address: eth::Address::repeat_byte(0xee),
            gas: eth::Gas(eth::U256::from(110_000)),
            state: liquidity::State::ConstantProduct(constant_product::Pool {
                reserves: constant_product::Reserves::new(
                    eth::Asset {
                        token: token(1),
                        amount: eth::U256::from(reserve_a),
                    },
                    eth::Asset {
                        token: token(2),
                        amount: eth::U256::from(reserve_b),
                    },
                )
                .unwrap(),
                fee: BigRational::new(3.into(), 1000.into()),
            }),
        }
    }

    fn batch(orders: Vec<order::Order>, pool: liquidity::Liquidity) -> Vec<Candidate> {
        let auction = auction(orders, vec![pool]);
        let builder = settlement::Builder::new(&auction, eth::Gas::default());
        let candidates = candidates(&auction, &builder, &Budget::unlimited());
        for candidate in &candidates {
            builder.build(candidate).unwrap();
        }
        candidates
    }

    #[test]
    fn finds_clearing_price_with_sell_orders_on_both_sides() {
        let orders = vec![
            order(1, (1, to_wei(40)), (2, to_wei(30)), Side::Sell, false),
            order(2, (2, to_wei(100)), (1, to_wei(90)), Side::Sell, false),
        ];
        let candidates = batch(orders, pool(to_wei(1000), to_wei(1000)));

        let interaction = &candidates[0].interactions[0];
        assert_eq!(interaction.input.token, token(2));
        assert_eq!(interaction.output.token, token(1));
        assert_eq!(candidates[0].trades.len(), 2);
    }

    #[test]
    fn finds_clearing_price_with_sell_orders_on_one_side() {
        let orders = vec![
            order(1, (1, to_wei(40)), (2, to_wei(30)), Side::Sell, false),
            order(2, (1, to_wei(100)), (2, to_wei(90)), Side::Sell, false),
        ];
        let candidates = batch(orders, pool(to_wei(1_000_000), to_wei(1_000_000)));

        let interaction = &candidates[0].interactions[0];
        assert_eq!(interaction.input.token, token(1));
        assert_eq!(interaction.output.token, token(2));
        assert!(interaction.input.amount <= eth::U256::from(to_wei(140)));
        assert!(interaction.output.amount >= eth::U256::from(to_wei(120)));
    }

    #[test]
    fn finds_clearing_price_with_buy_orders_on_both_sides() {
        let orders = vec![
            order(1, (1, to_wei(40)), (2, to_wei(30)), Side::Buy, false),
            order(2, (2, to_wei(100)), (1, to_wei(90)), Side::Buy, false),
        ];
        let candidates = batch(orders, pool(to_wei(1000), to_wei(1000)));

        let interaction = &candidates[0].interactions[0];
        assert_eq!(interaction.input.token, token(2));
        assert_eq!(interaction.output.token, token(1));
    }

    #[test]
    fn clears_at_spot_price_without_excess() {
        let orders = vec![
            order(1, (1, to_wei(100)), (2, to_wei(90)), Side::Sell, false),
            order(2, (2, to_wei(100)), (1, to_wei(90)), Side::Sell, false),
        ];
        let candidates = batch(orders, pool(to_wei(1000), to_wei(1000)));

        assert!(candidates[0].interactions.is_empty());
        assert_eq!(
            candidates[0].prices,
            ClearingPrices::new([
                (token(1), eth::U256::from(to_wei(1000))),
                (token(2), eth::U256::from(to_wei(1000))),
            ])
        );
    }

    #[test]
    fn removes_orders_with_worst_limit_price() {
        let orders = vec![
            order(1, (1, to_wei(40)), (2, to_wei(30)), Side::Sell, false),
            order(2, (1, to_wei(100)), (2, to_wei(900)), Side::Sell, false),
            order(3, (2, to_wei(10)), (1, to_wei(9)), Side::Sell, false),
        ];
        let candidates = batch(orders, pool(to_wei(1000), to_wei(1000)));

        let traded = candidates[0].orders();
        assert!(traded.contains(&order::Uid([1; 56])));
        assert!(!traded.contains(&order::Uid([2; 56])));
    }

    #[test]
    fn uses_deepest_pool() {
        let shallow = pool(1000, 1000);
        let mut deep = pool(2000, 2000);
        deep.id = liquidity::Id("1".to_owned());
        let sources = [shallow, deep];
        let (source, _) = deepest(&sources, token(1), token(2)).unwrap();
        assert_eq!(source.id.0, "1");
        assert!(deepest(&sources, token(1), token(3)).is_none());
    }
}
