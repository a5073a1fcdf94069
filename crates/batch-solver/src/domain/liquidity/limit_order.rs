//! Foreign limit order liquidity.

use {
    super::{Quote, QuoteError, State},
    crate::domain::eth,
    num::BigRational,
    number::u256_ext::U256Ext,
};

/// A 0x-like foreign limit order. The settlement pays taker tokens to the
/// order and receives maker tokens in return.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitOrder {
    /// The remaining amount of tokens the maker sells.
    pub maker: eth::Asset,
    /// The remaining amount of tokens the maker wants in return.
    pub taker: eth::Asset,
    /// Flat fee in the taker token, paid on top of the taker amount for every
    /// fill.
    pub fee: TakerAmount,
}

/// An amount denominated in the taker token of a [`LimitOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakerAmount(pub eth::U256);

impl LimitOrder {
    fn check_pair(
        &self,
        input: eth::TokenAddress,
        output: eth::TokenAddress,
    ) -> Result<(), QuoteError> {
        if input == self.taker.token && output == self.maker.token {
            Ok(())
        } else {
            Err(QuoteError::UnsupportedPair(input, output))
        }
    }

    pub fn exact_in(
        &self,
        input: eth::Asset,
        output: eth::TokenAddress,
    ) -> Result<Quote, QuoteError> {
        self.check_pair(input.token, output)?;
        let net = input
            .amount
            .checked_sub(self.fee.0)
            .filter(|net| !net.is_zero())
            .ok_or(QuoteError::InsufficientLiquidity)?;
        // Don't accept more than the order can still absorb.
        if net > self.taker.amount {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let out = net
            .checked_mul_div(&self.maker.amount, &self.taker.amount)
            .ok_or(QuoteError::Overflow)?;
        if out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }

        Ok(self.quote(net, input, out))
    }

    pub fn exact_out(
        &self,
        output: eth::Asset,
        input: eth::TokenAddress,
    ) -> Result<Quote, QuoteError> {
        self.check_pair(input, output.token)?;
        if output.amount > self.maker.amount {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let net = output
            .amount
            .checked_mul_div_ceil(&self.taker.amount, &self.maker.amount)
            .ok_or(QuoteError::Overflow)?;
        let amount = net.checked_add(self.fee.0).ok_or(QuoteError::Overflow)?;

        Ok(self.quote(
            net,
            eth::Asset {
                token: input,
                amount,
            },
            output.amount,
        ))
    }

    /// Maker tokens per taker token, ignoring the flat fee.
    pub fn spot_price(
        &self,
        sell: eth::TokenAddress,
        buy: eth::TokenAddress,
    ) -> Option<BigRational> {
        self.check_pair(sell, buy).ok()?;
        (!self.taker.amount.is_zero()).then(|| {
            BigRational::new(self.maker.amount.to_big_int(), self.taker.amount.to_big_int())
        })
    }

    /// The order after consuming `net` taker tokens for `out` maker tokens.
    /// Rounding always favours the maker so the remaining order never offers
    /// a better price than the original one.
    fn quote(&self, net: eth::U256, input: eth::Asset, out: eth::U256) -> Quote {
        Quote {
            input,
            output: eth::Asset {
                token: self.maker.token,
                amount: out,
            },
            state: State::LimitOrder(LimitOrder {
                maker: eth::Asset {
                    amount: self.maker.amount.saturating_sub(out),
                    ..self.maker
                },
                taker: eth::Asset {
                    amount: self.taker.amount.saturating_sub(net),
                    ..self.taker
                },
                fee: self.fee,
            }),
        }
    }
}
