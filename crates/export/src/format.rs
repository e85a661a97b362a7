use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

fn to_cents(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// `$` followed by the amount with exactly two decimals, e.g. `$2541.50` or `$-120.50`.
///
/// Values outside the decimal range (including NaN) fall back to float formatting.
pub fn format_currency(value: f64) -> String {
    match to_cents(value) {
        Some(amount) => format!("${:.2}", amount),
        None => format!("${:.2}", value),
    }
}

/// The value with two decimals and a `%` suffix.
pub fn format_percent(value: f64) -> String {
    match to_cents(value) {
        Some(amount) => format!("{:.2}%", amount),
        None => format!("{:.2}%", value),
    }
}
