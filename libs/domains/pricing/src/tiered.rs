//! Progressive ("tiered") price band evaluation.

use crate::models::PriceTier;

/// Apply progressive price bands to a consumed quantity.
///
/// Each tier's `up_to` is a cumulative upper bound, so a tier's capacity is
/// `up_to - previous_up_to`; a tier without `up_to` absorbs the remainder.
/// Evaluation stops once the quantity is exhausted or a tier has no billable
/// room. The result is not rounded.
pub fn apply_tiered_pricing(quantity: f64, tiers: &[PriceTier]) -> f64 {
    let mut remaining = quantity;
    let mut previous_bound = 0.0;
    let mut cost = 0.0;

    for tier in tiers {
        if remaining <= 0.0 {
            break;
        }

        let capacity = tier
            .up_to
            .map(|bound| bound - previous_bound)
            .unwrap_or(f64::INFINITY);
        let billable = remaining.min(capacity);
        if billable <= 0.0 {
            break;
        }

        cost += billable * tier.unit_price();
        remaining -= billable;

        if let Some(bound) = tier.up_to {
            previous_bound = bound;
        }
    }

    cost
}
