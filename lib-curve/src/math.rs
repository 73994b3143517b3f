//! Checked fixed-point arithmetic
//!
//! Every product of two amounts is formed in a 256-bit intermediate and every
//! result is narrowed back to `Amount` with an explicit range check. Nothing
//! in this module wraps or saturates: out-of-range values surface as
//! [`CurveError::ArithmeticOverflow`].

use uint::construct_uint;
use lib_types::{Amount, Bps, BPS_DENOMINATOR};

use crate::errors::{CurveError, CurveResult};

construct_uint! {
    /// Fixed-width 256-bit integer used for intermediate products.
    pub struct U256(4);
}

/// Lift an amount into the 256-bit domain
#[inline]
pub fn widen(value: Amount) -> U256 {
    U256::from(value)
}

/// Narrow a 256-bit intermediate back to an amount
#[inline]
pub fn narrow(value: U256) -> CurveResult<Amount> {
    if value > U256::from(Amount::MAX) {
        return Err(CurveError::ArithmeticOverflow);
    }
    Ok(value.low_u128())
}

/// `a * b` in 256 bits
#[inline]
pub fn product(a: Amount, b: Amount) -> CurveResult<U256> {
    widen(a)
        .checked_mul(widen(b))
        .ok_or(CurveError::ArithmeticOverflow)
}

/// `floor(numerator / denominator)`
pub fn div_floor(numerator: U256, denominator: Amount) -> CurveResult<Amount> {
    if denominator == 0 {
        return Err(CurveError::DivisionByZero);
    }
    narrow(numerator / widen(denominator))
}

/// `ceil(numerator / denominator)`
pub fn div_ceil(numerator: U256, denominator: Amount) -> CurveResult<Amount> {
    if denominator == 0 {
        return Err(CurveError::DivisionByZero);
    }
    let denominator = widen(denominator);
    let quotient = numerator / denominator;
    let rounded = if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(CurveError::ArithmeticOverflow)?
    };
    narrow(rounded)
}

/// `floor(a * b / d)`, multiply first
pub fn mul_div_floor(a: Amount, b: Amount, d: Amount) -> CurveResult<Amount> {
    div_floor(product(a, b)?, d)
}

/// `ceil(a * b / d)`, multiply first
pub fn mul_div_ceil(a: Amount, b: Amount, d: Amount) -> CurveResult<Amount> {
    div_ceil(product(a, b)?, d)
}

#[inline]
pub fn checked_add(a: Amount, b: Amount) -> CurveResult<Amount> {
    a.checked_add(b).ok_or(CurveError::ArithmeticOverflow)
}

#[inline]
pub fn checked_sub(a: Amount, b: Amount) -> CurveResult<Amount> {
    a.checked_sub(b).ok_or(CurveError::ArithmeticOverflow)
}

/// Fee share of `amount` at `bps` basis points, rounded down
pub fn bps_of(amount: Amount, bps: Bps) -> CurveResult<Amount> {
    if bps > BPS_DENOMINATOR {
        return Err(CurveError::InvalidParameters(format!(
            "basis points {} exceed {}",
            bps, BPS_DENOMINATOR
        )));
    }
    mul_div_floor(amount, Amount::from(bps), Amount::from(BPS_DENOMINATOR))
}
