use {
    crate::{
        domain::{auction, eth, liquidity, order},
        util::conv,
    },
    itertools::Itertools,
    solvers_dto::auction::*,
};

/// Converts a data transfer object into its domain object representation.
pub fn to_domain(auction: &Auction) -> Result<auction::Auction, auction::InputError> {
    auction::Auction::new(
        match auction.id {
            Some(id) => auction::Id::Solve(id),
            None => auction::Id::Quote,
        },
        auction::Tokens(
            auction
                .tokens
                .iter()
                .map(|(address, token)| {
                    (
                        eth::TokenAddress(*address),
                        auction::Token {
                            decimals: token.decimals,
                            symbol: token.symbol.clone(),
                            reference_price: token
                                .reference_price
                                .map(eth::Ether)
                                .map(auction::Price),
                            available_balance: token.available_balance,
                            trusted: token.trusted,
                        },
                    )
                })
                .collect(),
        ),
        auction
            .orders
            .iter()
            .map(|order| -> Result<order::Order, auction::InputError> {
                Ok(order::Order {
                    uid: order::Uid(order.uid),
                    sell: eth::Asset {
                        token: eth::TokenAddress(order.sell_token),
                        amount: order.sell_amount,
                    },
                    buy: eth::Asset {
                        token: eth::TokenAddress(order.buy_token),
                        amount: order.buy_amount,
                    },
                    side: match order.kind {
                        Kind::Buy => order::Side::Buy,
                        Kind::Sell => order::Side::Sell,
                    },
                    class: match order.class {
                        Class::Market => order::Class::Market,
                        Class::Limit => order::Class::Limit,
                        Class::Liquidity => order::Class::Liquidity,
                    },
                    fee: order::Fee(order.fee_amount),
                    fee_policies: order
                        .fee_policies
                        .iter()
                        .flatten()
                        .map(fee_policy::to_domain)
                        .try_collect()
                        .map_err(|reason| auction::InputError::InvalidFeePolicy {
                            order: order::Uid(order.uid),
                            reason,
                        })?,
                    partially_fillable: order.partially_fillable,
                })
            })
            .try_collect()?,
        auction
            .liquidity
            .iter()
            .map(|source| {
                let invalid = |reason| auction::InputError::InvalidLiquidity {
                    id: liquidity::Id(source.id().to_owned()),
                    reason,
                };
                match source {
                    Liquidity::ConstantProduct(pool) => constant_product_pool::to_domain(pool),
                    Liquidity::WeightedProduct(pool) => weighted_product_pool::to_domain(pool),
                    Liquidity::Stable(pool) => stable_pool::to_domain(pool),
                    Liquidity::ConcentratedLiquidity(pool) => {
                        concentrated_liquidity_pool::to_domain(pool)
                    }
                    Liquidity::LimitOrder(order) => foreign_limit_order::to_domain(order),
                }
                .map_err(invalid)
            })
            .try_collect()?,
        auction::GasPrice(eth::Ether(auction.effective_gas_price)),
        auction::Deadline(auction.deadline),
    )
}

/// Why a liquidity source can't be converted.
type Reason = &'static str;

fn fee(fee: &bigdecimal::BigDecimal) -> Result<num::BigRational, Reason> {
    conv::decimal_to_fee(fee).ok_or("fee must be in [0, 1)")
}

/// Checks that a pool lists at least two distinct tokens. Liquidity the
/// engine can't quote is still validated so malformed auctions are rejected
/// consistently.
fn distinct_tokens<'a>(tokens: impl IntoIterator<Item = &'a eth::Address>) -> Result<(), Reason> {
    let tokens = tokens.into_iter().collect::<Vec<_>>();
    if tokens.len() < 2 {
        return Err("pool must have at least two tokens");
    }
    if !tokens.iter().all_unique() {
        return Err("duplicate pool token");
    }
    Ok(())
}

mod fee_policy {
    use super::*;

    pub fn to_domain(policy: &FeePolicy) -> Result<order::FeePolicy, Reason> {
        Ok(match policy {
            FeePolicy::Surplus {
                factor,
                max_volume_factor,
            } => order::FeePolicy::Surplus {
                factor: self::factor(*factor)?,
                max_volume_factor: self::factor(*max_volume_factor)?,
            },
            FeePolicy::PriceImprovement {
                factor,
                max_volume_factor,
                quote,
            } => order::FeePolicy::PriceImprovement {
                factor: self::factor(*factor)?,
                max_volume_factor: self::factor(*max_volume_factor)?,
                quote: order::Quote {
                    sell: quote.sell_amount,
                    buy: quote.buy_amount,
                    fee: quote.fee,
                },
            },
            FeePolicy::Volume { factor } => order::FeePolicy::Volume {
                factor: self::factor(*factor)?,
            },
        })
    }

    fn factor(value: f64) -> Result<order::Factor, Reason> {
        num::BigRational::from_float(value)
            .and_then(order::Factor::new)
            .ok_or("fee policy factor must be in [0, 1)")
    }
}

mod constant_product_pool {
    use super::*;

    pub fn to_domain(pool: &ConstantProductPool) -> Result<liquidity::Liquidity, Reason> {
        let reserves = {
            let (a, b) = pool
                .tokens
                .iter()
                .map(|(token, reserve)| eth::Asset {
                    token: eth::TokenAddress(*token),
                    amount: reserve.balance,
                })
                .collect_tuple()
                .ok_or("invalid number of constant product tokens")?;
            liquidity::constant_product::Reserves::new(a, b)
                .ok_or("invalid constant product pool reserves")?
        };

        Ok(liquidity::Liquidity {
            id: liquidity::Id(pool.id.clone()),
            address: pool.address,
            gas: eth::Gas(pool.gas_estimate),
            state: liquidity::State::ConstantProduct(liquidity::constant_product::Pool {
                reserves,
                fee: fee(&pool.fee)?,
            }),
        })
    }
}

mod weighted_product_pool {
    use super::*;

    pub fn to_domain(pool: &WeightedProductPool) -> Result<liquidity::Liquidity, Reason> {
        distinct_tokens(pool.tokens.keys())?;
        fee(&pool.fee)?;
        Ok(liquidity::Liquidity {
            id: liquidity::Id(pool.id.clone()),
            address: pool.address,
            gas: eth::Gas(pool.gas_estimate),
            state: liquidity::State::Unsupported(liquidity::Kind::WeightedProduct),
        })
    }
}

mod stable_pool {
    use {super::*, num::Signed};

    pub fn to_domain(pool: &StablePool) -> Result<liquidity::Liquidity, Reason> {
        distinct_tokens(pool.tokens.keys())?;
        fee(&pool.fee)?;
        if !pool.amplification_parameter.is_positive() {
            return Err("invalid amplification parameter");
        }
        Ok(liquidity::Liquidity {
            id: liquidity::Id(pool.id.clone()),
            address: pool.address,
            gas: eth::Gas(pool.gas_estimate),
            state: liquidity::State::Unsupported(liquidity::Kind::Stable),
        })
    }
}

mod concentrated_liquidity_pool {
    use super::*;

    pub fn to_domain(pool: &ConcentratedLiquidityPool) -> Result<liquidity::Liquidity, Reason> {
        if pool.tokens.len() != 2 {
            return Err("invalid number of concentrated liquidity pool tokens");
        }
        distinct_tokens(&pool.tokens)?;
        fee(&pool.fee)?;
        Ok(liquidity::Liquidity {
            id: liquidity::Id(pool.id.clone()),
            address: pool.address,
            gas: eth::Gas(pool.gas_estimate),
            state: liquidity::State::Unsupported(liquidity::Kind::Concentrated),
        })
    }
}

mod foreign_limit_order {
    use super::*;

    pub fn to_domain(order: &ForeignLimitOrder) -> Result<liquidity::Liquidity, Reason> {
        if order.maker_token == order.taker_token {
            return Err("limit order trades a token for itself");
        }
        if order.maker_amount.is_zero() || order.taker_amount.is_zero() {
            return Err("limit order amounts must be positive");
        }
        Ok(liquidity::Liquidity {
            id: liquidity::Id(order.id.clone()),
            address: order.address,
            gas: eth::Gas(order.gas_estimate),
            state: liquidity::State::LimitOrder(liquidity::limit_order::LimitOrder {
                maker: eth::Asset {
                    token: eth::TokenAddress(order.maker_token),
                    amount: order.maker_amount,
                },
                taker: eth::Asset {
                    token: eth::TokenAddress(order.taker_token),
                    amount: order.taker_amount,
                },
                fee: liquidity::limit_order::TakerAmount(order.taker_token_fee_amount),
            }),
        })
    }
}
