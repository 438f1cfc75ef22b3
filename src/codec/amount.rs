use crate::{GatewayError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number of decimal places carried by the minor-unit representation.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a major-unit amount to the gateway's integer minor units.
///
/// The amount is multiplied by 100 and truncated; no rounding is applied.
/// Amounts that are not positive, or that truncate to zero minor units,
/// are rejected with [`GatewayError::InvalidAmount`].
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(GatewayError::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }

    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|v| v.trunc())
        .and_then(|v| v.to_i64())
        .ok_or_else(|| GatewayError::InvalidAmount(format!("amount {} is out of range", amount)))?;

    if minor == 0 {
        return Err(GatewayError::InvalidAmount(format!(
            "amount {} is below the smallest minor unit",
            amount
        )));
    }
    Ok(minor)
}

/// Parses a minor-unit string back into a major-unit amount.
///
/// Unparseable input yields zero instead of an error; callers treat zero
/// as "amount absent".
pub fn from_minor_units(text: &str) -> Decimal {
    text.trim()
        .parse::<i64>()
        .map(|v| Decimal::new(v, MINOR_UNIT_SCALE))
        .unwrap_or(Decimal::ZERO)
}

/// Accepts a floating point major-unit amount, rejecting NaN and infinities.
pub fn major_units_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(GatewayError::InvalidAmount(format!(
            "amount must be finite, got {}",
            value
        )));
    }
    Decimal::try_from(value).map_err(|e| GatewayError::InvalidAmount(e.to_string()))
}
