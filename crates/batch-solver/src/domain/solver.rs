//! The batch solver.
//!
//! Wraps the matching engine with the auction deadline handling and moves the
//! CPU-heavy search off the async runtime.

use {
    crate::{
        domain::{auction, matching, ranking, solution},
        infra,
    },
    std::{sync::Arc, time::Duration},
};

#[derive(Clone, Debug)]
pub struct Config {
    /// Time reserved before the auction deadline for serializing and sending
    /// the response.
    pub deadline_buffer: Duration,
    pub engine: matching::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deadline_buffer: Duration::from_secs(1),
            engine: Default::default(),
        }
    }
}

#[derive(Clone)]
pub struct Solver(Arc<Inner>);

struct Inner {
    engine: matching::Engine,
    deadline_buffer: Duration,
}

impl Solver {
    pub fn new(config: Config) -> Self {
        Self(Arc::new(Inner {
            engine: matching::Engine::new(config.engine, Arc::new(ranking::Surplus)),
            deadline_buffer: config.deadline_buffer,
        }))
    }

    /// Solves the auction, returning the best settlement found before the
    /// deadline or `None` if there is no valid settlement.
    pub async fn solve(&self, auction: auction::Auction) -> Option<solution::Settlement> {
        infra::observe::solve(&auction);
        let deadline = auction.deadline.reduce(self.0.deadline_buffer);
        let budget = matching::Budget::new(deadline.remaining().unwrap_or_default());

        let inner = self.0.clone();
        let id = auction.id;
        // Make sure to push the CPU-heavy code to a separate thread in order to
        // not lock up the [`tokio`] runtime.
        let settlement = tokio::task::spawn_blocking(move || inner.engine.solve(&auction, &budget))
            .await
            .unwrap_or_else(|err| {
                tracing::error!(?id, ?err, "matching engine panicked");
                None
            });

        infra::observe::solved(&deadline, settlement.is_some());
        settlement
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{
            eth,
            order::{Side, tests::order},
            settlement::tests::auction,
        },
    };

    #[tokio::test]
    async fn solves_before_the_deadline() {
        let a = order(1, (1, 100), (2, 90), Side::Sell, false);
        let b = order(2, (2, 100), (1, 90), Side::Sell, false);
        let mut auction = auction(vec![a, b], vec![]);
        auction.deadline = auction::Deadline(chrono::Utc::now() + chrono::Duration::seconds(30));

        let solver = Solver::new(Config::default());
        let settlement = solver.solve(auction).await.unwrap();
        assert_eq!(settlement.trades.len(), 2);
        assert_eq!(settlement.gas, eth::Gas(eth::U256::from(106_391)));
    }

    #[tokio::test]
    async fn expired_deadline_finds_nothing() {
        let a = order(1, (1, 100), (2, 90), Side::Sell, false);
        let b = order(2, (2, 100), (1, 90), Side::Sell, false);
        let mut auction = auction(vec![a, b], vec![]);
        auction.deadline = auction::Deadline(chrono::Utc::now());

        let solver = Solver::new(Config::default());
        assert!(solver.solve(auction).await.is_none());
    }
}
