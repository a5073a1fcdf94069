//! Data transfer objects of the solver engine HTTP interface.

pub mod auction;
pub mod serialize;
pub mod solution;
