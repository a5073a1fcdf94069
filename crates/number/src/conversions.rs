use {
    alloy_primitives::U256,
    anyhow::{Context, Result, ensure},
    bigdecimal::BigDecimal,
    num::{BigInt, BigRational, BigUint, Zero, bigint::Sign},
};

pub fn u256_to_big_uint(input: &U256) -> BigUint {
    BigUint::from_bytes_be(&input.to_be_bytes::<32>())
}

pub fn u256_to_big_int(input: &U256) -> BigInt {
    BigInt::from_biguint(Sign::Plus, u256_to_big_uint(input))
}

pub fn u256_to_big_rational(input: &U256) -> BigRational {
    BigRational::from_integer(u256_to_big_int(input))
}

pub fn big_uint_to_u256(input: &BigUint) -> Result<U256> {
    let bytes = input.to_bytes_be();
    ensure!(bytes.len() <= 32, "too large");
    Ok(U256::from_be_slice(&bytes))
}

pub fn big_int_to_u256(input: &BigInt) -> Result<U256> {
    ensure!(input.sign() != Sign::Minus, "negative");
    big_uint_to_u256(input.magnitude())
}

/// Converts a rational to a [`U256`], rounding towards zero.
pub fn big_rational_to_u256(ratio: &BigRational) -> Result<U256> {
    ensure!(!ratio.denom().is_zero(), "zero denominator");
    big_int_to_u256(&ratio.to_integer())
}

/// Largest decimal exponent accepted when converting decimals. Every `U256`
/// fits into 78 decimal digits.
pub const MAX_DECIMAL_EXPONENT: u32 = 78;

/// Exact conversion of a decimal (e.g. a pool fee of `0.003`) into a reduced
/// rational. Fails for exponents above [`MAX_DECIMAL_EXPONENT`] in magnitude.
pub fn big_decimal_to_big_rational(value: &BigDecimal) -> Result<BigRational> {
    let (numer, scale) = value.as_bigint_and_exponent();
    let exponent = u32::try_from(scale.unsigned_abs())
        .ok()
        .filter(|exponent| *exponent <= MAX_DECIMAL_EXPONENT)
        .context("decimal exponent out of range")?;
    let power = BigInt::from(10).pow(exponent);
    Ok(if scale >= 0 {
        BigRational::new(numer, power)
    } else {
        BigRational::from_integer(numer * power)
    })
}
