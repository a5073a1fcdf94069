use {
    crate::domain::{eth, liquidity, order},
    std::{
        collections::{HashMap, HashSet},
        time::Duration,
    },
};

/// The auction that the solvers need to find solutions to.
#[derive(Debug, Clone)]
pub struct Auction {
    pub id: Id,
    pub tokens: Tokens,
    pub orders: Vec<order::Order>,
    pub liquidity: Vec<liquidity::Liquidity>,
    pub gas_price: GasPrice,
    pub deadline: Deadline,
}

impl Auction {
    /// Creates a validated auction. Malformed instances are rejected before
    /// any solving work is done.
    pub fn new(
        id: Id,
        tokens: Tokens,
        orders: Vec<order::Order>,
        liquidity: Vec<liquidity::Liquidity>,
        gas_price: GasPrice,
        deadline: Deadline,
    ) -> Result<Self, InputError> {
        let mut uids = HashSet::new();
        for order in &orders {
            if !uids.insert(order.uid) {
                return Err(InputError::DuplicateOrder(order.uid));
            }
            if order.sell.amount.is_zero() || order.buy.amount.is_zero() {
                return Err(InputError::ZeroAmount(order.uid));
            }
            if order.sell.token == order.buy.token {
                return Err(InputError::SameToken(order.uid));
            }
            for token in [order.sell.token, order.buy.token] {
                if tokens.get(&token).is_none() {
                    return Err(InputError::MissingToken {
                        order: order.uid,
                        token,
                    });
                }
            }
        }

        let mut ids = HashSet::new();
        for source in &liquidity {
            if !ids.insert(&source.id) {
                return Err(InputError::DuplicateLiquidity(source.id.clone()));
            }
        }

        Ok(Self {
            id,
            tokens,
            orders,
            liquidity,
            gas_price,
            deadline,
        })
    }

    /// Looks up an order of the auction by its UID.
    pub fn order(&self, uid: &order::Uid) -> Option<&order::Order> {
        self.orders.iter().find(|order| &order.uid == uid)
    }

    /// Looks up a liquidity source of the auction by its ID.
    pub fn liquidity(&self, id: &liquidity::Id) -> Option<&liquidity::Liquidity> {
        self.liquidity.iter().find(|liquidity| &liquidity.id == id)
    }
}

/// Reasons for rejecting an auction instance as malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("order {order} references token {token} missing from the token map")]
    MissingToken {
        order: order::Uid,
        token: eth::TokenAddress,
    },
    #[error("order {0} has a zero sell or buy amount")]
    ZeroAmount(order::Uid),
    #[error("order {0} sells and buys the same token")]
    SameToken(order::Uid),
    #[error("duplicate order {0}")]
    DuplicateOrder(order::Uid),
    #[error("duplicate liquidity {0:?}")]
    DuplicateLiquidity(liquidity::Id),
    #[error("order {order} has an invalid fee policy: {reason}")]
    InvalidFeePolicy {
        order: order::Uid,
        reason: &'static str,
    },
    #[error("invalid liquidity {id:?}: {reason}")]
    InvalidLiquidity {
        id: liquidity::Id,
        reason: &'static str,
    },
}

/// The ID of an auction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Id {
    /// An auction for which solutions may be settled.
    Solve(i64),
    /// An auction used for price quotes.
    Quote,
}

/// Tokens referenced by the auction.
#[derive(Debug, Clone, Default)]
pub struct Tokens(pub HashMap<eth::TokenAddress, Token>);

impl Tokens {
    pub fn get(&self, token: &eth::TokenAddress) -> Option<&Token> {
        self.0.get(token)
    }

    pub fn reference_price(&self, token: &eth::TokenAddress) -> Option<Price> {
        self.get(token)?.reference_price
    }
}

#[derive(Debug, Clone, Default)]
pub struct Token {
    pub decimals: Option<u8>,
    pub symbol: Option<String>,
    pub reference_price: Option<Price>,
    pub available_balance: eth::U256,
    pub trusted: bool,
}

/// The price of a token in wei. This represents how much wei is needed to buy
/// 10**18 of another token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Price(pub eth::Ether);

/// The estimated effective gas price that will likely be used for executing the
/// settlement transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GasPrice(pub eth::Ether);

/// The time by which a solution has to be returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline(pub chrono::DateTime<chrono::Utc>);

impl Deadline {
    /// Returns the amount of time left to solve, or `None` if the deadline has
    /// already passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .signed_duration_since(chrono::Utc::now())
            .to_std()
            .ok()
    }

    /// Moves the deadline earlier by `buffer`, leaving room to serialize and
    /// send the response.
    pub fn reduce(self, buffer: Duration) -> Self {
        chrono::Duration::from_std(buffer)
            .ok()
            .and_then(|buffer| self.0.checked_sub_signed(buffer))
            .map_or(Self(chrono::DateTime::<chrono::Utc>::MIN_UTC), Self)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::order::{
            Side,
            tests::{order, token},
        },
    };

    fn tokens(bytes: &[u8]) -> Tokens {
        Tokens(
            bytes
                .iter()
                .map(|byte| (token(*byte), Token::default()))
                .collect(),
        )
    }

    fn auction(
        tokens: Tokens,
        orders: Vec<order::Order>,
        liquidity: Vec<liquidity::Liquidity>,
    ) -> Result<Auction, InputError> {
        Auction::new(
            Id::Solve(1),
            tokens,
            orders,
            liquidity,
            GasPrice::default(),
            Deadline(chrono::Utc::now() + chrono::Duration::seconds(10)),
        )
    }

    #[test]
    fn rejects_dangling_token_references() {
        let order = order(1, (1, 100), (2, 90), Side::Sell, false);
        assert_eq!(
            auction(tokens(&[1]), vec![order], vec![]).unwrap_err(),
            InputError::MissingToken {
                order: order::Uid([1; 56]),
                token: token(2),
            }
        );
    }

    #[test]
    fn rejects_zero_amounts_and_duplicates() {
        let zero = order(1, (1, 0), (2, 90), Side::Sell, false);
        assert_eq!(
            auction(tokens(&[1, 2]), vec![zero], vec![]).unwrap_err(),
            InputError::ZeroAmount(order::Uid([1; 56]))
        );

        let a = order(1, (1, 100), (2, 90), Side::Sell, false);
        let b = order(1, (2, 100), (1, 90), Side::Sell, false);
        assert_eq!(
            auction(tokens(&[1, 2]), vec![a, b], vec![]).unwrap_err(),
            InputError::DuplicateOrder(order::Uid([1; 56]))
        );

        let same = order(2, (1, 100), (1, 90), Side::Sell, false);
        assert_eq!(
            auction(tokens(&[1]), vec![same], vec![]).unwrap_err(),
            InputError::SameToken(order::Uid([2; 56]))
        );
    }

    #[test]
    fn rejects_duplicate_liquidity() {
        let source = liquidity::Liquidity {
            id: liquidity::Id("0".to_owned()),
            address: eth::Address::ZERO,
            gas: eth::Gas::default(),
            state: liquidity::State::Unsupported(liquidity::Kind::Stable),
        };
        assert_eq!(
            auction(tokens(&[]), vec![], vec![source.clone(), source]).unwrap_err(),
            InputError::DuplicateLiquidity(liquidity::Id("0".to_owned()))
        );
    }

    #[test]
    fn reduced_deadline() {
        let deadline = Deadline(chrono::Utc::now() + chrono::Duration::seconds(60));
        let reduced = deadline.reduce(Duration::from_secs(30));
        assert!(reduced.remaining().unwrap() <= Duration::from_secs(30));
        assert!(Deadline(chrono::Utc::now()).reduce(Duration::from_secs(1)).remaining().is_none());
    }
}
