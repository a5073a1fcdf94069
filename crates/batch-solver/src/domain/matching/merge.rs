//! Combining independent settlements.
//!
//! Settlements that don't share orders, priced tokens or liquidity sources
//! can be executed together. Merging them saves the settlement overhead and
//! lets the combined settlement outrank each of its parts.

use {
    super::{Budget, Strategy},
    crate::domain::{
        auction,
        ranking::{self, Objective},
        settlement,
        solution::{Candidate, Settlement},
    },
};

/// Greedily merges settlements with a positive score, best first. Returns
/// `None` unless at least two settlements could be combined.
pub fn merge(
    auction: &auction::Auction,
    builder: &settlement::Builder,
    objective: &dyn Objective,
    settlements: &[Settlement],
    budget: &Budget,
) -> Option<Settlement> {
    let mut merged: Option<(Candidate, Option<Settlement>)> = None;
    for (score, settlement) in ranking::rank(auction, objective, settlements) {
        if budget.exhausted() {
            break;
        }
        if !score.is_positive() {
            break;
        }

        let candidate = settlement.candidate();
        if merged.is_none() {
            merged = Some((candidate, None));
            continue;
        }
        let Some(combined) = merged
            .as_ref()
            .filter(|(current, _)| current.is_disjoint(&candidate))
            .map(|(current, _)| current.merge(&candidate))
        else {
            continue;
        };
        if let Some(settlement) = builder.validate(&combined, Strategy::Merge.name()) {
            merged = Some((combined, Some(settlement)));
        }
    }
    merged.and_then(|(_, settlement)| settlement)
}
