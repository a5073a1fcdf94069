//! Routing single orders through liquidity.
//!
//! Each order is matched on its own against the auction's liquidity, either
//! directly or through paths with intermediate tokens. The clearing prices
//! are the exchange rate of the best path, so the order receives exactly what
//! the liquidity pays out.

use {
    super::{Budget, Config},
    crate::domain::{
        auction,
        eth,
        liquidity,
        order,
        solution::{Candidate, ClearingPrices, Interaction, Trade},
    },
};

/// Proposes one candidate per order that can be executed through liquidity.
pub fn candidates(auction: &auction::Auction, config: &Config, budget: &Budget) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for order in &auction.orders {
        if budget.exhausted() {
            break;
        }
        match solve(&auction.liquidity, config, order) {
            Some(candidate) => candidates.push(candidate),
            None => tracing::trace!(order = %order.uid, "no route"),
        }
    }
    candidates
}

fn solve(
    liquidity: &[liquidity::Liquidity],
    config: &Config,
    order: &order::Order,
) -> Option<Candidate> {
    let paths = paths(liquidity, order.sell.token, order.buy.token, config.max_hops);
    if paths.is_empty() {
        return None;
    }

    let fill = |amount: eth::U256| {
        let route = best(&paths, order.side, amount)?;
        order
            .satisfies_limit(route.input.amount, route.output.amount)
            .then_some(route)
    };

    let target = order.target().amount;
    let (executed, route) = match fill(target) {
        Some(route) => (target, route),
        None if order.partially_fillable => {
            bisect(target, config.max_partial_fill_iterations, fill)?
        }
        None => return None,
    };

    let prices = ClearingPrices::new([
        (order.sell.token, route.output.amount),
        (order.buy.token, route.input.amount),
    ]);
    let trade = Trade::partial(order.clone(), executed, &prices)?;
    Some(Candidate {
        prices,
        trades: vec![trade],
        interactions: route.interactions,
    })
}

/// Searches the largest executable amount below `target` for which `fill`
/// succeeds.
fn bisect(
    target: eth::U256,
    iterations: u32,
    fill: impl Fn(eth::U256) -> Option<Route>,
) -> Option<(eth::U256, Route)> {
    let mut low = eth::U256::from(1);
    let mut high = target.saturating_sub(eth::U256::from(1));
    let mut found = None;
    for _ in 0..iterations {
        if low > high {
            break;
        }
        let mid = low + (high - low) / eth::U256::from(2);
        match fill(mid) {
            Some(route) => {
                found = Some((mid, route));
                low = mid + eth::U256::from(1);
            }
            None => high = mid - eth::U256::from(1),
        }
    }
    found
}

/// A swap of one token for another through a sequence of liquidity sources.
#[derive(Clone, Debug)]
pub struct Route {
    pub input: eth::Asset,
    pub output: eth::Asset,
    pub interactions: Vec<Interaction>,
}

#[derive(Clone, Copy, Debug)]
pub struct Hop<'a> {
    liquidity: &'a liquidity::Liquidity,
    input: eth::TokenAddress,
    output: eth::TokenAddress,
}

/// All paths from `sell` to `buy` with at most `max_hops` intermediate
/// tokens, shortest first. A path never visits a token or a source twice.
pub fn paths(
    liquidity: &[liquidity::Liquidity],
    sell: eth::TokenAddress,
    buy: eth::TokenAddress,
    max_hops: usize,
) -> Vec<Vec<Hop<'_>>> {
    let mut paths = Vec::new();
    search(liquidity, sell, buy, max_hops, &mut Vec::new(), &mut paths);
    paths.sort_by_key(Vec::len);
    paths
}

fn search<'a>(
    liquidity: &'a [liquidity::Liquidity],
    from: eth::TokenAddress,
    to: eth::TokenAddress,
    hops: usize,
    path: &mut Vec<Hop<'a>>,
    paths: &mut Vec<Vec<Hop<'a>>>,
) {
    let origin = path.first().map(|hop| hop.input).unwrap_or(from);
    for source in liquidity {
        if path.iter().any(|hop| hop.liquidity.id == source.id) {
            continue;
        }
        for next in source.state.tokens() {
            if !source.state.supports(from, next) {
                continue;
            }
            let hop = Hop {
                liquidity: source,
                input: from,
                output: next,
            };
            if next == to {
                path.push(hop);
                paths.push(path.clone());
                path.pop();
            } else if hops > 0
                && next != origin
                && path.iter().all(|hop| hop.output != next)
            {
                path.push(hop);
                search(liquidity, next, to, hops - 1, path, paths);
                path.pop();
            }
        }
    }
}

/// The best route over all paths: the largest output when selling `amount`,
/// or the smallest input when buying `amount`. Earlier paths win ties.
pub fn best(paths: &[Vec<Hop>], side: order::Side, amount: eth::U256) -> Option<Route> {
    let mut best: Option<Route> = None;
    for path in paths {
        let Some(route) = (match side {
            order::Side::Sell => exact_in(path, amount),
            order::Side::Buy => exact_out(path, amount),
        }) else {
            continue;
        };
        let better = match (&best, side) {
            (None, _) => true,
            (Some(best), order::Side::Sell) => route.output.amount > best.output.amount,
            (Some(best), order::Side::Buy) => route.input.amount < best.input.amount,
        };
        if better {
            best = Some(route);
        }
    }
    best
}

fn exact_in(path: &[Hop], amount: eth::U256) -> Option<Route> {
    let input = eth::Asset {
        token: path.first()?.input,
        amount,
    };
    let mut asset = input;
    let mut interactions = Vec::with_capacity(path.len());
    for hop in path {
        let quote = hop.liquidity.state.exact_in(asset, hop.output).ok()?;
        interactions.push(Interaction::from_quote(hop.liquidity.id.clone(), &quote));
        asset = quote.output;
    }
    Some(Route {
        input,
        output: asset,
        interactions,
    })
}

fn exact_out(path: &[Hop], amount: eth::U256) -> Option<Route> {
    let output = eth::Asset {
        token: path.last()?.output,
        amount,
    };
    let mut asset = output;
    let mut interactions = Vec::with_capacity(path.len());
    for hop in path.iter().rev() {
        let quote = hop.liquidity.state.exact_out(asset, hop.input).ok()?;
        interactions.push(Interaction::from_quote(hop.liquidity.id.clone(), &quote));
        asset = quote.input;
    }
    interactions.reverse();
    Some(Route {
        input: asset,
        output,
        interactions,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{
            order::{
                Side,
                tests::{order, token},
            },
            settlement::{
                self,
                tests::{auction, pool},
            },
        },
    };

    fn config(max_hops: usize) -> Config {
        Config {
            max_hops,
            ..Default::default()
        }
    }

    fn validate(auction: &auction::Auction, candidate: &Candidate) {
        settlement::Builder::new(auction, eth::Gas::default())
            .build(candidate)
            .unwrap();
    }

    #[test]
    fn fills_order_at_pool_rate() {
        let order = order(1, (1, 50), (2, 49), Side::Sell, false);
        let auction = auction(vec![order.clone()], vec![pool("0", (1, 1000), (2, 1029))]);

        let candidates = candidates(&auction, &config(1), &Budget::unlimited());
        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(
            candidate.prices,
            ClearingPrices::new([
                (token(1), eth::U256::from(49)),
                (token(2), eth::U256::from(50)),
            ])
        );
        assert_eq!(candidate.interactions.len(), 1);
        assert_eq!(candidate.interactions[0].output.amount, eth::U256::from(49));
        validate(&auction, candidate);
    }

    #[test]
    fn skips_orders_whose_limit_is_not_met() {
        let order = order(1, (1, 100), (2, 95), Side::Sell, false);
        let auction = auction(vec![order], vec![pool("0", (1, 1000), (2, 1040))]);
        assert!(candidates(&auction, &config(1), &Budget::unlimited()).is_empty());
    }

    #[test]
    fn buy_orders_pay_the_least_input() {
        let order = order(1, (1, 100), (2, 90), Side::Buy, false);
        let auction = auction(
            vec![order],
            vec![pool("0", (1, 1000), (2, 1000)), pool("1", (1, 2000), (2, 2000))],
        );

        let candidates = candidates(&auction, &config(1), &Budget::unlimited());
        let candidate = &candidates[0];
        // 2000 * 90 / 1910 + 1 = 95 beats 1000 * 90 / 910 + 1 = 99
        assert_eq!(candidate.interactions[0].liquidity.0, "1");
        assert_eq!(candidate.interactions[0].input.amount, eth::U256::from(95));
        assert_eq!(candidate.trades[0].sell, eth::U256::from(95));
        assert_eq!(candidate.trades[0].buy, eth::U256::from(90));
        validate(&auction, candidate);
    }

    #[test]
    fn multi_hop_routes() {
        let order = order(1, (1, 100), (2, 90), Side::Sell, false);
        let auction = auction(
            vec![order],
            vec![
                pool("direct", (1, 1000), (2, 1000)),
                pool("a", (1, 1000), (3, 2000)),
                pool("b", (3, 2000), (2, 2000)),
            ],
        );

        // 100 * 1000 / 1100 = 90
        let direct = candidates(&auction, &config(0), &Budget::unlimited());
        assert_eq!(direct[0].interactions.len(), 1);
        assert_eq!(direct[0].trades[0].buy, eth::U256::from(90));

        // 100 * 2000 / 1100 = 181, then 181 * 2000 / 2181 = 165
        let multi = candidates(&auction, &config(1), &Budget::unlimited());
        assert_eq!(multi[0].interactions.len(), 2);
        assert_eq!(multi[0].trades[0].buy, eth::U256::from(165));
        assert_eq!(multi[0].prices.0.len(), 2);
        validate(&auction, &multi[0]);
    }

    #[test]
    fn paths_never_revisit_tokens_or_sources() {
        let liquidity = vec![
            pool("a", (1, 1000), (2, 1000)),
            pool("b", (2, 1000), (1, 1000)),
            pool("c", (2, 1000), (3, 1000)),
        ];
        let paths = paths(&liquidity, token(1), token(3), 3);
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.len(), 2);
            assert_eq!(path[1].liquidity.id.0, "c");
        }
    }

    #[test]
    fn partially_fills_at_the_largest_executable_amount() {
        let order = order(1, (1, 100), (2, 95), Side::Sell, true);
        let auction = auction(vec![order.clone()], vec![pool("0", (1, 1000), (2, 1000))]);

        let candidates = candidates(&auction, &config(1), &Budget::unlimited());
        let trade = &candidates[0].trades[0];
        assert!(trade.sell > eth::U256::ZERO && trade.sell < eth::U256::from(100));
        assert!(order.satisfies_limit(trade.sell, trade.buy));
        validate(&auction, &candidates[0]);
    }

    #[test]
    fn exhausted_budget_stops_search() {
        let order = order(1, (1, 50), (2, 49), Side::Sell, false);
        let auction = auction(vec![order], vec![pool("0", (1, 1000), (2, 1029))]);
        let budget = Budget::new(std::time::Duration::ZERO);
        assert!(candidates(&auction, &config(1), &budget).is_empty());
    }
}
