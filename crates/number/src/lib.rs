//! Exact arithmetic helpers shared by the solver crates: conversions between
//! 256-bit integers and arbitrary precision numbers, and serde adapters for
//! token amounts.

pub mod conversions;
pub mod serialization;
pub mod u256_ext;
