//! The domain object representing a CoW Protocol order.

use {
    crate::{domain::eth, util},
    num::{BigRational, One, Signed},
    number::u256_ext::U256Ext,
    std::fmt::{self, Debug, Display, Formatter},
};

/// A CoW Protocol order in the auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uid: Uid,
    pub sell: eth::Asset,
    pub buy: eth::Asset,
    /// Additional sell token amount the order pays for its execution, charged
    /// proportionally to the executed fraction of the order.
    pub fee: Fee,
    /// Protocol fees the order is subject to. They are carried for objectives
    /// that account for them and are never charged by the settlement itself.
    pub fee_policies: Vec<FeePolicy>,
    pub side: Side,
    pub class: Class,
    pub partially_fillable: bool,
}

impl Order {
    /// Returns `true` if the order expects a solver-computed fee.
    pub fn solver_determines_fee(&self) -> bool {
        self.class == Class::Limit
    }

    /// The asset whose amount is fixed by the order: the sell asset for sell
    /// orders and the buy asset for buy orders.
    pub fn target(&self) -> eth::Asset {
        match self.side {
            Side::Sell => self.sell,
            Side::Buy => self.buy,
        }
    }

    /// Returns `true` if executing `sell` for `buy` respects the order's limit
    /// price, i.e. `buy / sell >= order.buy / order.sell`.
    pub fn satisfies_limit(&self, sell: eth::U256, buy: eth::U256) -> bool {
        buy.to_big_int() * self.sell.amount.to_big_int()
            >= self.buy.amount.to_big_int() * sell.to_big_int()
    }

    /// Returns `true` if the limit prices of the two orders overlap, that is
    /// there exists a price at which both orders can trade with each other.
    pub fn overlaps(&self, other: &Order) -> bool {
        self.sell.token == other.buy.token
            && self.buy.token == other.sell.token
            && self.buy.amount.to_big_int() * other.buy.amount.to_big_int()
                <= other.sell.amount.to_big_int() * self.sell.amount.to_big_int()
    }

    /// The fee charged for executing `executed` units of the order's target
    /// asset, rounded down.
    pub fn fee_for(&self, executed: eth::U256) -> eth::U256 {
        self.fee
            .0
            .checked_mul_div(&executed, &self.target().amount)
            .unwrap_or_default()
    }
}

/// UID of an order.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Uid(pub [u8; 56]);

impl Debug for Uid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("Uid")
            .field(&util::fmt::Hex(&self.0))
            .finish()
    }
}

impl Display for Uid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&util::fmt::Hex(&self.0), f)
    }
}

/// The trading side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// An order with a fixed buy amount and maximum sell amount.
    Buy,
    /// An order with a fixed sell amount and a minimum buy amount.
    Sell,
}

/// The order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Market,
    Limit,
    Liquidity,
}

/// A fee amount denominated in the order's sell token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Fee(pub eth::U256);

/// A protocol fee policy attached to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeePolicy {
    /// A share of the surplus over the limit price, capped by a share of the
    /// order's volume.
    Surplus {
        factor: Factor,
        max_volume_factor: Factor,
    },
    /// A share of the improvement over the quote, capped by a share of the
    /// order's volume.
    PriceImprovement {
        factor: Factor,
        max_volume_factor: Factor,
        quote: Quote,
    },
    /// A share of the order's volume.
    Volume { factor: Factor },
}

/// A fraction in the range `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor(BigRational);

impl Factor {
    pub fn new(value: BigRational) -> Option<Self> {
        (!value.is_negative() && value < BigRational::one()).then_some(Self(value))
    }

    pub fn get(&self) -> &BigRational {
        &self.0
    }
}

/// The quote an order was placed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub sell: eth::U256,
    pub buy: eth::U256,
    pub fee: eth::U256,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn token(byte: u8) -> eth::TokenAddress {
        eth::TokenAddress(eth::Address::repeat_byte(byte))
    }

    pub fn order(
        id: u8,
        (sell_token, sell_amount): (u8, u64),
        (buy_token, buy_amount): (u8, u64),
        side: Side,
        partially_fillable: bool,
    ) -> Order {
        Order {
            uid: Uid([id; 56]),
            sell: eth::Asset {
                token: token(sell_token),
                amount: eth::U256::from(sell_amount),
            },
            buy: eth::Asset {
                token: token(buy_token),
                amount: eth::U256::from(buy_amount),
            },
            fee: Fee::default(),
            fee_policies: Vec::new(),
            side,
            class: Class::Market,
            partially_fillable,
        }
    }

    #[test]
    fn limit_price() {
        let order = order(1, (1, 100), (2, 90), Side::Sell, false);
        assert!(order.satisfies_limit(eth::U256::from(100), eth::U256::from(90)));
        assert!(order.satisfies_limit(eth::U256::from(10), eth::U256::from(9)));
        assert!(!order.satisfies_limit(eth::U256::from(100), eth::U256::from(89)));
    }

    #[test]
    fn overlapping_orders() {
        let a = order(1, (1, 100), (2, 90), Side::Sell, false);
        let b = order(2, (2, 100), (1, 90), Side::Sell, false);
        let c = order(3, (2, 100), (1, 120), Side::Sell, false);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&a));
    }

    #[test]
    fn fee_policy_factors() {
        let factor =
            |numer: i64, denom: i64| Factor::new(BigRational::new(numer.into(), denom.into()));
        assert!(factor(0, 1).is_some());
        assert!(factor(1, 2).is_some());
        assert!(factor(1, 1).is_none());
        assert!(factor(-1, 10).is_none());
    }

    #[test]
    fn pro_rata_fee() {
        let mut order = order(1, (1, 100), (2, 90), Side::Sell, true);
        order.fee = Fee(eth::U256::from(10));
        assert_eq!(order.fee_for(eth::U256::from(100)), eth::U256::from(10));
        assert_eq!(order.fee_for(eth::U256::from(55)), eth::U256::from(5));
        assert_eq!(order.fee_for(eth::U256::ZERO), eth::U256::ZERO);
    }
}
