//! Scoring and selection of settlements.

use {
    crate::domain::{
        auction,
        eth,
        order,
        solution::{Settlement, Trade},
    },
    num::{BigInt, BigRational, Zero},
    number::u256_ext::U256Ext,
    std::cmp::Ordering,
};

/// A policy assigning a quality score to a settlement. Higher is better.
pub trait Objective: Send + Sync {
    fn score(&self, auction: &auction::Auction, settlement: &Settlement) -> Score;
}

/// An exact settlement score denominated in wei.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(pub BigRational);

impl Score {
    pub fn is_positive(&self) -> bool {
        self.0 > BigRational::zero()
    }
}

/// Surplus of all trades plus the fees they pay, valued at the auction's
/// reference prices, minus the cost of executing the settlement.
#[derive(Clone, Copy, Debug, Default)]
pub struct Surplus;

impl Objective for Surplus {
    fn score(&self, auction: &auction::Auction, settlement: &Settlement) -> Score {
        let trades = settlement
            .trades
            .iter()
            .map(|trade| surplus(auction, trade) + fee(auction, trade))
            .fold(BigRational::zero(), |total, value| total + value);
        let cost = settlement.gas.0.to_big_int() * auction.gas_price.0.0.to_big_int();
        Score(trades - BigRational::from_integer(cost))
    }
}

/// The surplus of a trade over its limit price, in wei.
fn surplus(auction: &auction::Auction, trade: &Trade) -> BigRational {
    let order = &trade.order;
    let limit = BigRational::new(order.buy.amount.to_big_int(), order.sell.amount.to_big_int());
    match order.side {
        order::Side::Sell => {
            let minimum = trade.sell.to_big_rational() * limit;
            value(auction, order.buy.token, trade.buy.to_big_rational() - minimum)
        }
        order::Side::Buy => {
            let maximum = trade.buy.to_big_rational() / limit;
            value(auction, order.sell.token, maximum - trade.sell.to_big_rational())
        }
    }
}

fn fee(auction: &auction::Auction, trade: &Trade) -> BigRational {
    value(auction, trade.order.sell.token, trade.fee().to_big_rational())
}

/// Values an amount of tokens in wei. Tokens without a reference price are
/// worth nothing.
fn value(auction: &auction::Auction, token: eth::TokenAddress, amount: BigRational) -> BigRational {
    match auction.tokens.reference_price(&token) {
        Some(price) => {
            amount * price.0.0.to_big_rational()
                / BigRational::from_integer(BigInt::from(10).pow(18))
        }
        None => BigRational::zero(),
    }
}

/// Scores the settlements and returns them from best to worst. Ties are
/// broken by fewer interactions and then by discovery order.
pub fn rank<'a>(
    auction: &auction::Auction,
    objective: &dyn Objective,
    settlements: impl IntoIterator<Item = &'a Settlement>,
) -> Vec<(Score, &'a Settlement)> {
    let mut ranked = settlements
        .into_iter()
        .map(|settlement| (objective.score(auction, settlement), settlement))
        .collect::<Vec<_>>();
    ranked.sort_by(|(a_score, a), (b_score, b)| compare(b_score, b, a_score, a));
    ranked
}

fn compare(a_score: &Score, a: &Settlement, b_score: &Score, b: &Settlement) -> Ordering {
    a_score
        .cmp(b_score)
        .then_with(|| b.interactions.len().cmp(&a.interactions.len()))
}

/// Picks the best settlement, if any. The best one is returned even if its
/// score is negative.
pub fn best(
    auction: &auction::Auction,
    objective: &dyn Objective,
    settlements: Vec<Settlement>,
) -> Option<Settlement> {
    let (score, best) = rank(auction, objective, &settlements).into_iter().next()?;
    tracing::debug!(score = %score.0, trades = best.trades.len(), "selected settlement");
    Some(best.clone())
}
