//! Validation of candidate solutions.
//!
//! Matching strategies are allowed to be wrong. Every candidate is checked
//! here with exact integer arithmetic against the original auction before it
//! may be ranked and returned.

use {
    crate::{
        domain::{
            auction,
            eth,
            liquidity,
            order,
            solution::{Candidate, ClearingPrices, Settlement},
        },
        infra,
    },
    num::{BigInt, Signed},
    number::u256_ext::U256Ext,
    std::collections::{BTreeMap, BTreeSet, HashMap},
};

/// Turns candidates into settlements for a single auction.
pub struct Builder<'a> {
    auction: &'a auction::Auction,
    overhead: eth::Gas,
}

impl<'a> Builder<'a> {
    pub fn new(auction: &'a auction::Auction, overhead: eth::Gas) -> Self {
        Self { auction, overhead }
    }

    /// Validates a candidate, logging and counting the reason if it is
    /// rejected.
    pub fn validate(&self, candidate: &Candidate, strategy: &'static str) -> Option<Settlement> {
        infra::observe::candidate(strategy);
        match self.build(candidate) {
            Ok(settlement) => Some(settlement),
            Err(rejection) => {
                tracing::warn!(
                    strategy,
                    reason = rejection.reason(),
                    %rejection,
                    ?candidate,
                    "discarding invalid candidate"
                );
                infra::observe::rejected(&rejection);
                None
            }
        }
    }

    /// Checks every settlement invariant and builds the settlement.
    pub fn build(&self, candidate: &Candidate) -> Result<Settlement, Rejection> {
        if candidate.trades.is_empty() {
            return Err(Rejection::Empty);
        }

        let mut balances = Balances::default();
        let mut traded = BTreeSet::new();
        let mut tokens = BTreeSet::new();
        for trade in &candidate.trades {
            let uid = trade.order.uid;
            let order = self
                .auction
                .order(&uid)
                .ok_or(Rejection::UnknownOrder(uid))?;
            if order != &trade.order {
                return Err(Rejection::ModifiedOrder(uid));
            }
            if !traded.insert(uid) {
                return Err(Rejection::DuplicateTrade(uid));
            }

            let executed = trade.executed().amount;
            let target = order.target().amount;
            if executed.is_zero()
                || executed > target
                || (!order.partially_fillable && executed != target)
            {
                return Err(Rejection::InvalidFill(uid));
            }

            for token in [order.sell.token, order.buy.token] {
                if candidate.prices.get(&token).is_none() {
                    return Err(Rejection::MissingPrice(token));
                }
                tokens.insert(token);
            }
            if candidate.prices.execute(order, executed) != Some((trade.sell, trade.buy)) {
                return Err(Rejection::InconsistentPrice(uid));
            }
            if !order.satisfies_limit(trade.sell, trade.buy) {
                return Err(Rejection::LimitViolated(uid));
            }

            balances.credit(order.sell.token, trade.sell);
            balances.credit(order.sell.token, trade.fee());
            balances.debit(order.buy.token, trade.buy);
        }

        let mut states = HashMap::<&liquidity::Id, liquidity::State>::new();
        let mut gas = self.overhead;
        for interaction in &candidate.interactions {
            let source = self
                .auction
                .liquidity(&interaction.liquidity)
                .ok_or_else(|| Rejection::UnknownLiquidity(interaction.liquidity.clone()))?;
            let state = states.entry(&source.id).or_insert_with(|| source.state.clone());
            let quote = state
                .exact_in(interaction.input, interaction.output.token)
                .map_err(|err| Rejection::InfeasibleInteraction(source.id.clone(), err))?;
            if interaction.output.amount.is_zero()
                || interaction.output.amount > quote.output.amount
            {
                return Err(Rejection::ExceedsLiquidity(source.id.clone()));
            }
            *state = quote.state;
            gas = gas + source.gas;

            balances.credit(interaction.output.token, interaction.output.amount);
            balances.debit(interaction.input.token, interaction.input.amount);
        }

        if let Some((token, deficit)) = balances.deficit() {
            return Err(Rejection::Conservation { token, deficit });
        }

        Ok(Settlement {
            prices: ClearingPrices(
                candidate
                    .prices
                    .0
                    .iter()
                    .filter(|(token, _)| tokens.contains(*token))
                    .map(|(token, price)| (*token, *price))
                    .collect(),
            ),
            trades: candidate.trades.clone(),
            interactions: candidate.interactions.clone(),
            gas,
        })
    }
}

/// Net token flows of the settlement contract.
#[derive(Default)]
struct Balances(BTreeMap<eth::TokenAddress, BigInt>);

impl Balances {
    fn credit(&mut self, token: eth::TokenAddress, amount: eth::U256) {
        *self.0.entry(token).or_default() += amount.to_big_int();
    }

    fn debit(&mut self, token: eth::TokenAddress, amount: eth::U256) {
        *self.0.entry(token).or_default() -= amount.to_big_int();
    }

    /// The first token the settlement would be short of.
    fn deficit(&self) -> Option<(eth::TokenAddress, BigInt)> {
        self.0
            .iter()
            .find(|(_, balance)| balance.is_negative())
            .map(|(token, balance)| (*token, -balance))
    }
}

/// The reason a candidate was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("candidate has no trades")]
    Empty,
    #[error("order {0} is not part of the auction")]
    UnknownOrder(order::Uid),
    #[error("order {0} differs from the auction order")]
    ModifiedOrder(order::Uid),
    #[error("order {0} is traded more than once")]
    DuplicateTrade(order::Uid),
    #[error("invalid executed amount for order {0}")]
    InvalidFill(order::Uid),
    #[error("no clearing price for token {0}")]
    MissingPrice(eth::TokenAddress),
    #[error("executed amounts of order {0} don't match the clearing prices")]
    InconsistentPrice(order::Uid),
    #[error("order {0} executes below its limit price")]
    LimitViolated(order::Uid),
    #[error("liquidity {0:?} is not part of the auction")]
    UnknownLiquidity(liquidity::Id),
    #[error("liquidity {0:?} can't execute interaction: {1}")]
    InfeasibleInteraction(liquidity::Id, liquidity::QuoteError),
    #[error("interaction output exceeds what liquidity {0:?} provides")]
    ExceedsLiquidity(liquidity::Id),
    #[error("settlement is short {deficit} of token {token}")]
    Conservation {
        token: eth::TokenAddress,
        deficit: BigInt,
    },
}

impl Rejection {
    /// A short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::UnknownOrder(_) => "unknown_order",
            Self::ModifiedOrder(_) => "modified_order",
            Self::DuplicateTrade(_) => "duplicate_trade",
            Self::InvalidFill(_) => "invalid_fill",
            Self::MissingPrice(_) => "missing_price",
            Self::InconsistentPrice(_) => "inconsistent_price",
            Self::LimitViolated(_) => "limit_violated",
            Self::UnknownLiquidity(_) => "unknown_liquidity",
            Self::InfeasibleInteraction(..) => "infeasible_interaction",
            Self::ExceedsLiquidity(_) => "exceeds_liquidity",
            Self::Conservation { .. } => "conservation",
        }
    }
}
