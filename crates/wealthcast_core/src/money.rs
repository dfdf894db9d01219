//! Conversions between fixed-point currency amounts and the `f64` values the
//! engine computes with.
//!
//! Amounts cross the public API as [`Decimal`] rounded to two places; all
//! simulation arithmetic happens in `f64`.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Decimal places kept on currency outputs
pub const CURRENCY_SCALE: u32 = 2;

/// Convert an engine value to a currency amount with exactly two decimal places.
///
/// Non-finite or out-of-range values saturate: NaN maps to zero, and
/// infinities map to the largest representable amount of the same sign.
#[must_use]
pub fn to_money(value: f64) -> Decimal {
    if value.is_nan() {
        return Decimal::ZERO;
    }
    match Decimal::from_f64(value) {
        Some(d) => {
            let mut amount = d.round_dp(CURRENCY_SCALE);
            amount.rescale(CURRENCY_SCALE);
            amount
        }
        None if value > 0.0 => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// Convert a currency amount into the engine's working precision
#[must_use]
pub fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}
