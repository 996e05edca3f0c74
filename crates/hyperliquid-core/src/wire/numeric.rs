//! Decimal conversions for prices, sizes and amounts.
//!
//! Funds-related values must never be silently truncated, so both
//! conversions fail with [`Error::PrecisionLoss`] instead of dropping
//! digits past their tolerance. Values that cannot be scaled at all fail
//! with [`Error::UnsupportedValue`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Error, Result};

/// Maximum fractional digits in a wire string.
pub const WIRE_DECIMALS: u32 = 8;

/// Scale for generic integers placed inside hashed content.
pub const HASH_SCALE: u32 = 8;

/// Scale for USD-denominated integers (USDC has 6 decimals).
pub const USD_SCALE: u32 = 6;

/// Canonical decimal string for the JSON payload.
///
/// Rounds to 8 fractional digits, strips trailing zeros and never uses
/// scientific notation. `-0` becomes `"0"`.
pub fn to_wire_string(value: Decimal) -> Result<String> {
    let rounded = value.round_dp_with_strategy(WIRE_DECIMALS, RoundingStrategy::MidpointNearestEven);

    // 1e-12
    if (rounded - value).abs() >= Decimal::new(1, 12) {
        return Err(Error::precision_loss(
            value,
            format!("more than {} significant fractional digits", WIRE_DECIMALS),
        ));
    }

    let normalized = rounded.normalize();
    if normalized.is_zero() {
        return Ok("0".to_string());
    }
    Ok(normalized.to_string())
}

/// `value * 10^scale` rounded to the nearest integer.
pub fn to_scaled_integer(value: Decimal, scale: u32) -> Result<i128> {
    let factor = 10i64
        .checked_pow(scale)
        .map(Decimal::from)
        .ok_or_else(|| Error::UnsupportedValue(format!("scale {} is too large", scale)))?;

    let scaled = value
        .checked_mul(factor)
        .ok_or_else(|| {
            Error::UnsupportedValue(format!("{} overflows when scaled by 10^{}", value, scale))
        })?;
    let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);

    // 1e-3
    if (rounded - scaled).abs() >= Decimal::new(1, 3) {
        return Err(Error::precision_loss(
            value,
            format!("not representable with {} decimals", scale),
        ));
    }

    rounded
        .to_i128()
        .ok_or_else(|| Error::UnsupportedValue(format!("{} is out of integer range", rounded)))
}

/// Integer form used for hashed numeric fields.
pub fn to_hash_int(value: Decimal) -> Result<i128> {
    to_scaled_integer(value, HASH_SCALE)
}

/// Integer form used for USD amounts.
pub fn to_usd_int(value: Decimal) -> Result<i128> {
    to_scaled_integer(value, USD_SCALE)
}
