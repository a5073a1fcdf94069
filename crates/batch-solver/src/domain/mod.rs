//! Core solver engine logic.

pub mod auction;
pub mod eth;
pub mod liquidity;
pub mod matching;
pub mod order;
pub mod ranking;
pub mod settlement;
pub mod solution;
pub mod solver;
