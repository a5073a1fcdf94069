//! Constant product pool.

use {
    super::{Quote, QuoteError, State},
    crate::domain::eth,
    num::{BigInt, BigRational, One, Zero},
    number::u256_ext::U256Ext,
    std::cmp::Ordering,
};

/// Uniswap-v2 like pool state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    pub reserves: Reserves,
    /// The fraction of the input amount kept by the pool, in `[0, 1)`.
    pub fee: BigRational,
}

/// Constant product reserves, sorted by token address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reserves(eth::Asset, eth::Asset);

impl Reserves {
    pub fn new(a: eth::Asset, b: eth::Asset) -> Option<Self> {
        match a.token.cmp(&b.token) {
            Ordering::Less => Some(Self(a, b)),
            Ordering::Equal => None,
            Ordering::Greater => Some(Self(b, a)),
        }
    }

    pub fn get(&self) -> (eth::Asset, eth::Asset) {
        (self.0, self.1)
    }

    /// Returns the reserve of the specified token.
    pub fn of(&self, token: eth::TokenAddress) -> Option<eth::U256> {
        if token == self.0.token {
            Some(self.0.amount)
        } else if token == self.1.token {
            Some(self.1.amount)
        } else {
            None
        }
    }

    /// Returns `(reserve_in, reserve_out)` for swapping `input` into `output`.
    fn relative(
        &self,
        input: eth::TokenAddress,
        output: eth::TokenAddress,
    ) -> Result<(eth::U256, eth::U256), QuoteError> {
        match (self.of(input), self.of(output)) {
            (Some(reserve_in), Some(reserve_out)) if input != output => {
                Ok((reserve_in, reserve_out))
            }
            _ => Err(QuoteError::UnsupportedPair(input, output)),
        }
    }

    /// The constant product `k`, used to rank pools by depth.
    pub fn k(&self) -> BigInt {
        self.0.amount.to_big_int() * self.1.amount.to_big_int()
    }
}

impl Pool {
    /// `(numerator, denominator)` of the fee-adjusted fraction of the input
    /// that enters the invariant, i.e. `1 - fee`.
    fn fee_factors(&self) -> (BigInt, BigInt) {
        let remaining = BigRational::one() - &self.fee;
        (remaining.numer().clone(), remaining.denom().clone())
    }

    pub fn exact_in(
        &self,
        input: eth::Asset,
        output: eth::TokenAddress,
    ) -> Result<Quote, QuoteError> {
        let (reserve_in, reserve_out) = self.reserves.relative(input.token, output)?;
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }

        let (numer, denom) = self.fee_factors();
        let amount_in_with_fee = input.amount.to_big_int() * numer;
        let numerator = &amount_in_with_fee * reserve_out.to_big_int();
        let denominator = reserve_in.to_big_int() * denom + amount_in_with_fee;
        let amount_out = eth::U256::from_big_int(&(numerator / denominator))
            .map_err(|_| QuoteError::Overflow)?;
        if amount_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }

        self.quote(
            input,
            eth::Asset {
                token: output,
                amount: amount_out,
            },
        )
    }

    pub fn exact_out(
        &self,
        output: eth::Asset,
        input: eth::TokenAddress,
    ) -> Result<Quote, QuoteError> {
        let (reserve_in, reserve_out) = self.reserves.relative(input, output.token)?;
        if reserve_in.is_zero() || output.amount >= reserve_out {
            return Err(QuoteError::InsufficientLiquidity);
        }

        let (numer, denom) = self.fee_factors();
        let numerator = reserve_in.to_big_int() * output.amount.to_big_int() * denom;
        let denominator = (reserve_out - output.amount).to_big_int() * numer;
        if denominator.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let amount_in = eth::U256::from_big_int(&(numerator / denominator + 1))
            .map_err(|_| QuoteError::Overflow)?;

        self.quote(
            eth::Asset {
                token: input,
                amount: amount_in,
            },
            output,
        )
    }

    /// Reserve ratio `reserve_buy / reserve_sell`, i.e. the amount of `buy`
    /// received per unit of `sell` for an infinitesimal swap without fees.
    pub fn spot_price(
        &self,
        sell: eth::TokenAddress,
        buy: eth::TokenAddress,
    ) -> Option<BigRational> {
        let (reserve_in, reserve_out) = self.reserves.relative(sell, buy).ok()?;
        (!reserve_in.is_zero())
            .then(|| BigRational::new(reserve_out.to_big_int(), reserve_in.to_big_int()))
    }

    fn quote(&self, input: eth::Asset, output: eth::Asset) -> Result<Quote, QuoteError> {
        let (a, b) = self.reserves.get();
        let apply = |reserve: eth::Asset| -> Result<eth::Asset, QuoteError> {
            let amount = if reserve.token == input.token {
                reserve
                    .amount
                    .checked_add(input.amount)
                    .ok_or(QuoteError::Overflow)?
            } else {
                reserve
                    .amount
                    .checked_sub(output.amount)
                    .ok_or(QuoteError::InsufficientLiquidity)?
            };
            Ok(eth::Asset { amount, ..reserve })
        };
        let reserves = Reserves::new(apply(a)?, apply(b)?)
            .ok_or(QuoteError::UnsupportedPair(input.token, output.token))?;

        Ok(Quote {
            input,
            output,
            state: State::ConstantProduct(Pool {
                reserves,
                fee: self.fee.clone(),
            }),
        })
    }
}
