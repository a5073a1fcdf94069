pub mod conv;
pub mod fmt;
