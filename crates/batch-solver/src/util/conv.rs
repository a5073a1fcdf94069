//! Conversion utilities.

use {
    bigdecimal::BigDecimal,
    num::{BigRational, One, Signed},
};

/// Converts a decimal pool fee (e.g. `0.003`) into an exact rational. Returns
/// `None` if the fee is not in the range `[0, 1)` or can't be represented
/// exactly.
pub fn decimal_to_fee(d: &BigDecimal) -> Option<BigRational> {
    let fee = number::conversions::big_decimal_to_big_rational(&d.normalized()).ok()?;
    (!fee.is_negative() && fee < BigRational::one()).then_some(fee)
}
