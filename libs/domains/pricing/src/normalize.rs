//! Configuration normalization shared by every cost model.
//!
//! Models declare their configuration as a serde struct with field defaults
//! and `validator` range rules; [`parse_configuration`] turns the raw JSON
//! into that struct. The unit helpers below keep conversions out of the
//! arithmetic in each model.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::error::{PricingError, PricingResult};

/// Hours billed in a month
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Seconds in a month
pub const SECONDS_PER_MONTH: f64 = HOURS_PER_MONTH * 3600.0;

/// Minutes in a month
pub const MINUTES_PER_MONTH: f64 = HOURS_PER_MONTH * 60.0;

/// Parse and validate a raw configuration.
///
/// A missing (`null`) configuration is treated as an empty object so that a
/// model whose fields all have defaults can be evaluated without input.
pub fn parse_configuration<T>(service_code: &str, configuration: Value) -> PricingResult<T>
where
    T: DeserializeOwned + Validate,
{
    let configuration = match configuration {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    let parsed: T = serde_json::from_value(configuration)
        .map_err(|e| PricingError::invalid_configuration(service_code, e.to_string()))?;

    parsed
        .validate()
        .map_err(|e| PricingError::invalid_configuration(service_code, e.to_string()))?;

    Ok(parsed)
}

/// Look up a named rate, first exactly then case-insensitively
pub fn rate_for<'a, V>(
    table: &'a HashMap<String, V>,
    key: &str,
    service_code: &str,
    kind: &str,
) -> PricingResult<&'a V> {
    if let Some(rate) = table.get(key) {
        return Ok(rate);
    }

    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, rate)| rate)
        .ok_or_else(|| PricingError::rate_not_found(service_code, kind, key))
}

/// Quantity left to bill once a free allowance is deducted, never negative
pub fn billable_after_free_tier(quantity: f64, free_allowance: f64) -> f64 {
    (quantity - free_allowance).max(0.0)
}

pub fn mb_to_gb(mb: f64) -> f64 {
    mb / 1024.0
}

pub fn ms_to_seconds(ms: f64) -> f64 {
    ms / 1000.0
}

/// Express a raw count in millions
pub fn per_million(count: f64) -> f64 {
    count / 1_000_000.0
}

/// Number of billing chunks a payload occupies, at least one
pub fn chunks(payload_kb: f64, chunk_kb: f64) -> f64 {
    if chunk_kb <= 0.0 {
        return 1.0;
    }
    (payload_kb / chunk_kb).ceil().max(1.0)
}

/// Round a quantity up to the next multiple of `increment`
pub fn round_up_to(quantity: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return quantity;
    }
    (quantity / increment).ceil() * increment
}

pub(crate) fn default_hours() -> f64 {
    HOURS_PER_MONTH
}

pub(crate) fn default_one() -> u32 {
    1
}

pub(crate) fn default_true() -> bool {
    true
}
