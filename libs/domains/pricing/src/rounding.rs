//! Shared numeric policy: amounts are rounded to cents once, at the outermost
//! result, and annual figures are derived from the rounded monthly figure.

/// Months in a year
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Round a monetary amount to two decimal places
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Annual cost derived from a monthly cost: `round(monthly × 12)`
pub fn annualize(monthly: f64) -> f64 {
    round_to_cents(monthly * MONTHS_PER_YEAR)
}
