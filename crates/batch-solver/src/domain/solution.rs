use {
    crate::domain::{eth, liquidity, order},
    number::u256_ext::U256Ext,
    std::collections::{BTreeMap, BTreeSet},
};

/// A proposed solution produced by a matching strategy. Candidates are
/// untrusted until the settlement builder has validated them.
#[derive(Clone, Debug, Default)]
pub struct Candidate {
    pub prices: ClearingPrices,
    pub trades: Vec<Trade>,
    pub interactions: Vec<Interaction>,
}

impl Candidate {
    /// The UIDs of all orders traded by the candidate.
    pub fn orders(&self) -> BTreeSet<order::Uid> {
        self.trades.iter().map(|trade| trade.order.uid).collect()
    }

    /// The liquidity sources used by the candidate.
    pub fn liquidity(&self) -> BTreeSet<&liquidity::Id> {
        self.interactions
            .iter()
            .map(|interaction| &interaction.liquidity)
            .collect()
    }

    /// Returns `true` if both candidates can be executed together without
    /// affecting each other: they share no order, no priced token and no
    /// liquidity source.
    pub fn is_disjoint(&self, other: &Candidate) -> bool {
        self.orders().is_disjoint(&other.orders())
            && self.liquidity().is_disjoint(&other.liquidity())
            && self
                .prices
                .0
                .keys()
                .all(|token| !other.prices.0.contains_key(token))
    }

    /// Combines two disjoint candidates into one.
    pub fn merge(&self, other: &Candidate) -> Candidate {
        Candidate {
            prices: ClearingPrices(
                self.prices
                    .0
                    .iter()
                    .chain(&other.prices.0)
                    .map(|(token, price)| (*token, *price))
                    .collect(),
            ),
            trades: self.trades.iter().chain(&other.trades).cloned().collect(),
            interactions: self
                .interactions
                .iter()
                .chain(&other.interactions)
                .cloned()
                .collect(),
        }
    }
}

/// A set of uniform clearing prices. They are represented as a mapping of token
/// addresses to price in an arbitrarily denominated price. Tokens are kept
/// sorted so that equal settlements serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearingPrices(pub BTreeMap<eth::TokenAddress, eth::U256>);

impl ClearingPrices {
    /// Creates a new set of clearing prices.
    pub fn new(prices: impl IntoIterator<Item = (eth::TokenAddress, eth::U256)>) -> Self {
        Self(prices.into_iter().collect())
    }

    pub fn get(&self, token: &eth::TokenAddress) -> Option<eth::U256> {
        self.0.get(token).copied().filter(|price| !price.is_zero())
    }

    /// Computes the amounts exchanged when executing `executed` units of the
    /// order's target asset at these prices. Sell orders receive rounded down
    /// buy amounts and buy orders pay rounded up sell amounts.
    pub fn execute(
        &self,
        order: &order::Order,
        executed: eth::U256,
    ) -> Option<(eth::U256, eth::U256)> {
        let sell_price = self.get(&order.sell.token)?;
        let buy_price = self.get(&order.buy.token)?;
        match order.side {
            order::Side::Sell => {
                let buy = executed.checked_mul_div(&sell_price, &buy_price)?;
                Some((executed, buy))
            }
            order::Side::Buy => {
                let sell = executed.checked_mul_div_ceil(&buy_price, &sell_price)?;
                Some((sell, executed))
            }
        }
    }
}

/// A trade which executes an order as part of a solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    pub order: order::Order,
    /// The amount of sell tokens the order pays, excluding the fee.
    pub sell: eth::U256,
    /// The amount of buy tokens the order receives.
    pub buy: eth::U256,
}

impl Trade {
    /// Creates a trade executing the order to the specified amount at the
    /// given prices. Returns `None` if the fill amount is incompatible with the
    /// order or the prices don't cover the order's tokens.
    pub fn partial(
        order: order::Order,
        executed: eth::U256,
        prices: &ClearingPrices,
    ) -> Option<Self> {
        let target = order.target().amount;
        if executed.is_zero()
            || executed > target
            || (!order.partially_fillable && executed != target)
        {
            return None;
        }
        let (sell, buy) = prices.execute(&order, executed)?;
        Some(Self { order, sell, buy })
    }

    /// Creates a trade fully executing the order at the given prices.
    pub fn fill(order: order::Order, prices: &ClearingPrices) -> Option<Self> {
        let target = order.target().amount;
        Self::partial(order, target, prices)
    }

    /// The executed amount of the order's target asset.
    pub fn executed(&self) -> eth::Asset {
        match self.order.side {
            order::Side::Sell => eth::Asset {
                token: self.order.sell.token,
                amount: self.sell,
            },
            order::Side::Buy => eth::Asset {
                token: self.order.buy.token,
                amount: self.buy,
            },
        }
    }

    /// The sell token fee charged for this execution.
    pub fn fee(&self) -> eth::U256 {
        self.order.fee_for(self.executed().amount)
    }
}

/// A swap against one of the auction's liquidity sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub liquidity: liquidity::Id,
    pub input: eth::Asset,
    pub output: eth::Asset,
}

impl Interaction {
    pub fn from_quote(liquidity: liquidity::Id, quote: &liquidity::Quote) -> Self {
        Self {
            liquidity,
            input: quote.input,
            output: quote.output,
        }
    }
}

/// A candidate that passed every settlement check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Prices of traded tokens only.
    pub prices: ClearingPrices,
    pub trades: Vec<Trade>,
    pub interactions: Vec<Interaction>,
    pub gas: eth::Gas,
}

impl Settlement {
    /// Converts the settlement back into a candidate, e.g. for merging.
    pub fn candidate(&self) -> Candidate {
        Candidate {
            prices: self.prices.clone(),
            trades: self.trades.clone(),
            interactions: self.interactions.clone(),
        }
    }
}
