//! Extension trait for U256 arithmetic operations.

use {
    crate::conversions,
    alloy_primitives::U256,
    anyhow::Result,
    num::{BigInt, BigRational, BigUint},
};

/// Extension trait for U256 to add utility methods.
pub trait U256Ext: Sized {
    /// Ceiling division: (self + other - 1) / other
    fn checked_ceil_div(&self, other: &Self) -> Option<Self>;

    /// `self * numerator / denominator` rounded down, `None` on overflow or
    /// division by zero.
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self>;

    /// `self * numerator / denominator` rounded up, `None` on overflow or
    /// division by zero.
    fn checked_mul_div_ceil(&self, numerator: &Self, denominator: &Self) -> Option<Self>;

    fn to_big_int(&self) -> BigInt;

    fn to_big_uint(&self) -> BigUint;

    fn to_big_rational(&self) -> BigRational;

    fn from_big_int(input: &BigInt) -> Result<Self>;

    /// Rounds towards zero.
    fn from_big_rational(value: &BigRational) -> Result<Self>;
}

impl U256Ext for U256 {
    fn checked_ceil_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let (quotient, remainder) = self.div_rem(*other);
        if remainder.is_zero() {
            Some(quotient)
        } else {
            quotient.checked_add(U256::from(1))
        }
    }

    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let product = self.to_big_int() * numerator.to_big_int();
        Self::from_big_int(&(product / denominator.to_big_int())).ok()
    }

    fn checked_mul_div_ceil(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let product = self.to_big_int() * numerator.to_big_int();
        let denominator = denominator.to_big_int();
        let ceil = (product + &denominator - 1) / denominator;
        Self::from_big_int(&ceil).ok()
    }

    fn to_big_int(&self) -> BigInt {
        conversions::u256_to_big_int(self)
    }

    fn to_big_uint(&self) -> BigUint {
        conversions::u256_to_big_uint(self)
    }

    fn to_big_rational(&self) -> BigRational {
        conversions::u256_to_big_rational(self)
    }

    fn from_big_int(input: &BigInt) -> Result<Self> {
        conversions::big_int_to_u256(input)
    }

    fn from_big_rational(value: &BigRational) -> Result<Self> {
        conversions::big_rational_to_u256(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_div() {
        let seven = U256::from(7);
        assert_eq!(seven.checked_ceil_div(&U256::from(2)), Some(U256::from(4)));
        assert_eq!(seven.checked_ceil_div(&U256::from(7)), Some(U256::from(1)));
        assert_eq!(U256::ZERO.checked_ceil_div(&seven), Some(U256::ZERO));
        assert_eq!(seven.checked_ceil_div(&U256::ZERO), None);
    }

    #[test]
    fn mul_div_does_not_overflow_on_intermediate_products() {
        let value = U256::MAX;
        assert_eq!(value.checked_mul_div(&U256::from(3), &U256::from(3)), Some(U256::MAX));
        assert_eq!(value.checked_mul_div(&U256::from(3), &U256::from(2)), None);
        assert_eq!(
            U256::from(10).checked_mul_div_ceil(&U256::from(1), &U256::from(3)),
            Some(U256::from(4))
        );
        assert_eq!(
            U256::from(10).checked_mul_div(&U256::from(1), &U256::from(3)),
            Some(U256::from(3))
        );
    }
}
