//! Metrics Engine v1 - Display Helpers
//!
//! Cosmetic currency abbreviation for the rendering layer. Never feeds
//! back into the numbers.

use crate::arithmetic::round_half_up;

/// Abbreviate a currency amount: `$1.2M`, `$85K`, `$950`.
/// With `abs`, the magnitude is formatted. Negative amounts without `abs`
/// fall through to the plain form.
pub fn format_currency(value: f64, abs: bool) -> String {
    let num = if abs { value.abs() } else { value };
    abbreviate(num)
}

/// Same bands as `format_currency`, signed input as-is.
pub fn format_budget_impact(value: i64) -> String {
    abbreviate(value as f64)
}

fn abbreviate(num: f64) -> String {
    if num >= 1_000_000.0 {
        format!("${:.1}M", round_half_up(num / 100_000.0) / 10.0)
    } else if num >= 1_000.0 {
        format!("${:.0}K", round_half_up(num / 1_000.0))
    } else {
        format!("${}", num)
    }
}
