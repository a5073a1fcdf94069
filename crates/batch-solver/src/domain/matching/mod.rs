//! The matching engine searches for candidate solutions of an auction.
//!
//! Several strategies propose candidates independently. Every candidate goes
//! through the settlement builder, and the surviving settlements are merged
//! where possible and ranked by the configured objective.

use {
    crate::domain::{
        auction,
        eth,
        ranking::{self, Objective},
        settlement,
        solution::{Candidate, Settlement},
    },
    std::{
        sync::Arc,
        time::{Duration, Instant},
    },
};

pub mod batch;
pub mod cow;
pub mod merge;
pub mod route;

/// Engine tuning parameters.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of intermediate tokens in a routed path.
    pub max_hops: usize,
    /// Maximum number of bisection steps when searching the largest partial
    /// fill of an order.
    pub max_partial_fill_iterations: u32,
    /// Whether disjoint settlements are combined into larger ones.
    pub merge: bool,
    /// Gas used by a settlement regardless of its interactions.
    pub settlement_overhead: eth::Gas,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hops: 1,
            max_partial_fill_iterations: 32,
            merge: true,
            settlement_overhead: eth::Gas(eth::U256::from(106_391)),
        }
    }
}

/// A soft wall clock deadline. Strategies check it between candidates and
/// stop early, keeping whatever they have found so far.
#[derive(Debug)]
pub struct Budget(Limit);

#[derive(Debug)]
enum Limit {
    Unlimited,
    Deadline(Instant),
    /// Expires once the given number of checks has passed.
    #[cfg(test)]
    Checks(std::cell::Cell<usize>),
}

impl Budget {
    pub fn new(remaining: Duration) -> Self {
        match Instant::now().checked_add(remaining) {
            Some(deadline) => Self(Limit::Deadline(deadline)),
            None => Self::unlimited(),
        }
    }

    pub fn unlimited() -> Self {
        Self(Limit::Unlimited)
    }

    #[cfg(test)]
    pub fn checks(passing: usize) -> Self {
        Self(Limit::Checks(std::cell::Cell::new(passing)))
    }

    pub fn exhausted(&self) -> bool {
        match &self.0 {
            Limit::Unlimited => false,
            Limit::Deadline(deadline) => Instant::now() >= *deadline,
            #[cfg(test)]
            Limit::Checks(remaining) => match remaining.get() {
                0 => true,
                n => {
                    remaining.set(n - 1);
                    false
                }
            },
        }
    }
}

/// The matching strategies, in the order they are run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Cow,
    Route,
    Batch,
    Merge,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cow => "cow",
            Self::Route => "route",
            Self::Batch => "batch",
            Self::Merge => "merge",
        }
    }
}

pub struct Engine {
    config: Config,
    objective: Arc<dyn Objective>,
}

impl Engine {
    pub fn new(config: Config, objective: Arc<dyn Objective>) -> Self {
        Self { config, objective }
    }

    /// Finds the best settlement for the auction within the budget.
    pub fn solve(&self, auction: &auction::Auction, budget: &Budget) -> Option<Settlement> {
        let builder = settlement::Builder::new(auction, self.config.settlement_overhead);
        let mut settlements = Vec::new();

        let crossing = || cow::candidates(auction, &builder, budget);
        let routing = || route::candidates(auction, &self.config, budget);
        let batching = || batch::candidates(auction, &builder, budget);
        let strategies: [(Strategy, &dyn Fn() -> Vec<Candidate>); 3] = [
            (Strategy::Cow, &crossing),
            (Strategy::Route, &routing),
            (Strategy::Batch, &batching),
        ];

        for (strategy, candidates) in strategies {
            if budget.exhausted() {
                tracing::debug!(strategy = strategy.name(), "budget exhausted");
                break;
            }
            let candidates = candidates();
            tracing::debug!(
                strategy = strategy.name(),
                candidates = candidates.len(),
                "generated candidates"
            );
            for candidate in candidates {
                if budget.exhausted() {
                    break;
                }
                settlements.extend(builder.validate(&candidate, strategy.name()));
            }
        }

        if self.config.merge && settlements.len() > 1 && !budget.exhausted() {
            let merged = merge::merge(
                auction,
                &builder,
                self.objective.as_ref(),
                &settlements,
                budget,
            );
            settlements.extend(merged);
        }

        ranking::best(auction, self.objective.as_ref(), settlements)
    }
}
