//! Coincidence of wants between pairs of orders.
//!
//! Two orders trading opposite directions of a token pair whose limit prices
//! overlap can be settled directly against each other. The side with the
//! smaller volume is filled completely, and what remains of the other side is
//! either routed through a single liquidity source, left unfilled for
//! partially fillable orders, or makes the pair infeasible.

use {
    super::{Budget, route},
    crate::domain::{
        auction,
        eth,
        order,
        settlement,
        solution::{Candidate, ClearingPrices, Trade},
    },
    itertools::Itertools,
    num::{BigInt, BigRational},
    number::u256_ext::U256Ext,
    std::collections::HashSet,
};

/// Pairs up crossing orders, first seen first. Every order is part of at most
/// one candidate.
pub fn candidates(
    auction: &auction::Auction,
    builder: &settlement::Builder,
    budget: &Budget,
) -> Vec<Candidate> {
    let mut matched = HashSet::new();
    let mut candidates = Vec::new();
    for (i, a) in auction.orders.iter().enumerate() {
        if budget.exhausted() {
            break;
        }
        if matched.contains(&a.uid) {
            continue;
        }
        for b in &auction.orders[i + 1..] {
            if matched.contains(&b.uid) || !a.overlaps(b) {
                continue;
            }
            if let Some(candidate) = cross(auction, builder, a, b) {
                tracing::debug!(a = %a.uid, b = %b.uid, "crossing orders");
                matched.extend([a.uid, b.uid]);
                candidates.push(candidate);
                break;
            }
        }
    }
    candidates
}

/// Settles two crossing orders at the first feasible rate.
fn cross(
    auction: &auction::Auction,
    builder: &settlement::Builder,
    a: &order::Order,
    b: &order::Order,
) -> Option<Candidate> {
    rates(a, b)
        .into_iter()
        .filter_map(|rate| clearing_prices(a, &rate))
        .flat_map(|prices| settle(auction, a, b, prices))
        .find(|candidate| builder.build(candidate).is_ok())
}

/// Candidate exchange rates, in `a.buy` tokens per `a.sell` token, in order
/// of preference. All of them lie within both limit prices.
fn rates(a: &order::Order, b: &order::Order) -> Vec<BigRational> {
    let ratio = |numer: eth::U256, denom: eth::U256| {
        BigRational::new(numer.to_big_int(), denom.to_big_int())
    };
    let low = ratio(a.buy.amount, a.sell.amount);
    let high = ratio(b.sell.amount, b.buy.amount);

    // The rate at which both orders are filled completely.
    let complete = match (a.side, b.side) {
        (order::Side::Sell, order::Side::Sell) => Some(ratio(b.sell.amount, a.sell.amount)),
        (order::Side::Buy, order::Side::Buy) => Some(ratio(a.buy.amount, b.buy.amount)),
        _ => None,
    }
    .filter(|rate| &low <= rate && rate <= &high);
    let midpoint = (&low + &high) / BigRational::from_integer(BigInt::from(2));

    complete
        .into_iter()
        .chain([midpoint, low, high])
        .unique()
        .collect()
}

fn clearing_prices(a: &order::Order, rate: &BigRational) -> Option<ClearingPrices> {
    Some(ClearingPrices::new([
        (a.sell.token, eth::U256::from_big_int(rate.numer()).ok()?),
        (a.buy.token, eth::U256::from_big_int(rate.denom()).ok()?),
    ]))
}

/// Builds the candidates for a pair at fixed prices, the preferred one first.
fn settle(
    auction: &auction::Auction,
    a: &order::Order,
    b: &order::Order,
    prices: ClearingPrices,
) -> Vec<Candidate> {
    let value = |order: &order::Order| -> Option<BigInt> {
        let target = order.target();
        Some(target.amount.to_big_int() * prices.get(&target.token)?.to_big_int())
    };
    let (Some(value_a), Some(value_b)) = (value(a), value(b)) else {
        return Vec::new();
    };
    let (full, partial) = if value_a <= value_b { (a, b) } else { (b, a) };

    let Some(full) = Trade::fill(full.clone(), &prices) else {
        return Vec::new();
    };
    // The partial side trades exactly what the full side needs.
    let executed = match partial.side {
        order::Side::Sell => full.buy,
        order::Side::Buy => full.sell,
    };
    let target = partial.target();
    if executed == target.amount {
        return Trade::fill(partial.clone(), &prices)
            .map(|partial| Candidate {
                prices: prices.clone(),
                trades: vec![full.clone(), partial],
                interactions: Vec::new(),
            })
            .into_iter()
            .collect();
    }

    let mut candidates = Vec::new();
    let remainder = target.amount.saturating_sub(executed);
    let routed = route::paths(&auction.liquidity, partial.sell.token, partial.buy.token, 0);
    if let (Some(route), Some(trade)) = (
        route::best(&routed, partial.side, remainder),
        Trade::fill(partial.clone(), &prices),
    ) {
        candidates.push(Candidate {
            prices: prices.clone(),
            trades: vec![full.clone(), trade],
            interactions: route.interactions,
        });
    }
    if let Some(trade) = Trade::partial(partial.clone(), executed, &prices) {
        candidates.push(Candidate {
            prices,
            trades: vec![full, trade],
            interactions: Vec::new(),
        });
    }
    candidates
}
