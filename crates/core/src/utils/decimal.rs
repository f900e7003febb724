//! Zero-guarded arithmetic helpers.
//!
//! Every ratio in the crate goes through these so that an empty portfolio, a
//! zero target or a zero cost basis yields 0 instead of a panic.

use std::str::FromStr;

use log::warn;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::constants::ONE_HUNDRED;

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
    }
}

/// `part` as a percentage (0-100 scale) of `total`, zero when `total` is zero.
pub fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    safe_div(part * ONE_HUNDRED, total)
}

/// A 0-100 percentage as a 0-1 weight.
pub fn weight_from_percent(percent: Decimal) -> Decimal {
    percent / ONE_HUNDRED
}

/// Parses a string into a Decimal, with support for scientific notation.
/// Anything unparseable becomes zero.
pub fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    let trimmed = value_str.trim();
    match Decimal::from_str(trimmed) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(trimmed) {
            Ok(d) => d,
            Err(e_scientific) => {
                warn!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}

/// Coerces an arbitrary JSON value into a Decimal: numbers and numeric strings
/// are parsed, everything else is zero.
pub fn decimal_from_value(value: &Value, field_name: &str) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal_tolerant(&n.to_string(), field_name),
        Value::String(s) => parse_decimal_tolerant(s, field_name),
        Value::Null => Decimal::ZERO,
        other => {
            warn!(
                "Non-numeric {} '{}'. Falling back to ZERO.",
                field_name, other
            );
            Decimal::ZERO
        }
    }
}

/// Serde helper for fields that must never reject a document because of a
/// malformed number.
pub fn deserialize_decimal_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value, "number"))
}

/// Monthly rate equivalent to an annual percentage rate:
/// `(1 + annual/100)^(1/12) - 1`.
pub fn monthly_rate_from_annual_percent(annual_percent: Decimal) -> Decimal {
    let annual = annual_percent.to_f64().unwrap_or(0.0) / 100.0;
    let base = 1.0 + annual;
    if base <= 0.0 {
        // A -100% year wipes the account out in the first month.
        return -Decimal::ONE;
    }
    Decimal::from_f64(base.powf(1.0 / 12.0) - 1.0).unwrap_or(Decimal::ZERO)
}
