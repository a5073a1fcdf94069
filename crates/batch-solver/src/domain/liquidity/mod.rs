//! Modelling on-chain liquidity.
//!
//! Every source is a read-only snapshot. Quoting never mutates a source;
//! instead each quote carries the state the source would be in after the
//! swap, so speculative paths can be explored and discarded freely.

pub mod constant_product;
pub mod limit_order;

use {crate::domain::eth, num::BigRational};

/// A source of liquidity which can be used by the solver.
#[derive(Clone, Debug)]
pub struct Liquidity {
    pub id: Id,
    pub address: eth::Address,
    /// Estimation of gas needed to use this liquidity on-chain.
    pub gas: eth::Gas,
    pub state: State,
}

/// The opaque identifier of a liquidity source within an auction.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(pub String);

/// The liquidity state, specific to the type of liquidity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    ConstantProduct(constant_product::Pool),
    LimitOrder(limit_order::LimitOrder),
    /// A source that is understood by the wire format but can't be quoted.
    Unsupported(Kind),
}

/// Kinds of liquidity the engine does not have a pricing formula for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    WeightedProduct,
    Stable,
    Concentrated,
}

/// The result of quoting a swap against a liquidity snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub input: eth::Asset,
    pub output: eth::Asset,
    /// The state of the source after executing the swap.
    pub state: State,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("source does not trade {0} for {1}")]
    UnsupportedPair(eth::TokenAddress, eth::TokenAddress),
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    #[error("zero amount")]
    ZeroAmount,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("unsupported liquidity source {0:?}")]
    UnsupportedSource(Kind),
}

impl State {
    /// Quotes how much of `output` is received when swapping exactly `input`.
    pub fn exact_in(
        &self,
        input: eth::Asset,
        output: eth::TokenAddress,
    ) -> Result<Quote, QuoteError> {
        if input.amount.is_zero() {
            return Err(QuoteError::ZeroAmount);
        }
        match self {
            Self::ConstantProduct(pool) => pool.exact_in(input, output),
            Self::LimitOrder(order) => order.exact_in(input, output),
            Self::Unsupported(kind) => Err(QuoteError::UnsupportedSource(*kind)),
        }
    }

    /// Quotes how much of `input` is required to receive exactly `output`.
    pub fn exact_out(
        &self,
        output: eth::Asset,
        input: eth::TokenAddress,
    ) -> Result<Quote, QuoteError> {
        if output.amount.is_zero() {
            return Err(QuoteError::ZeroAmount);
        }
        match self {
            Self::ConstantProduct(pool) => pool.exact_out(output, input),
            Self::LimitOrder(order) => order.exact_out(output, input),
            Self::Unsupported(kind) => Err(QuoteError::UnsupportedSource(*kind)),
        }
    }

    /// The marginal price of `buy` in units of `sell` before any price impact,
    /// or `None` if the source can't be quoted for the pair.
    pub fn spot_price(
        &self,
        sell: eth::TokenAddress,
        buy: eth::TokenAddress,
    ) -> Option<BigRational> {
        match self {
            Self::ConstantProduct(pool) => pool.spot_price(sell, buy),
            Self::LimitOrder(order) => order.spot_price(sell, buy),
            Self::Unsupported(_) => None,
        }
    }

    /// The tokens that can be swapped with this source, in ascending order.
    pub fn tokens(&self) -> Vec<eth::TokenAddress> {
        match self {
            Self::ConstantProduct(pool) => {
                let (a, b) = pool.reserves.get();
                vec![a.token, b.token]
            }
            Self::LimitOrder(order) => {
                let mut tokens = vec![order.maker.token, order.taker.token];
                tokens.sort();
                tokens
            }
            Self::Unsupported(_) => vec![],
        }
    }

    /// Returns `true` if the source can swap `input` for `output`.
    pub fn supports(&self, input: eth::TokenAddress, output: eth::TokenAddress) -> bool {
        match self {
            Self::ConstantProduct(pool) => {
                let (a, b) = pool.reserves.get();
                (input == a.token && output == b.token) || (input == b.token && output == a.token)
            }
            Self::LimitOrder(order) => input == order.taker.token && output == order.maker.token,
            Self::Unsupported(_) => false,
        }
    }
}
