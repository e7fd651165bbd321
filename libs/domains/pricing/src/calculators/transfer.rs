use serde::{Deserialize, Serialize};

use crate::models::PriceTier;
use crate::normalize::billable_after_free_tier;
use crate::tiered::apply_tiered_pricing;

/// Outbound data transfer rates: a monthly free allowance, then progressive bands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRates {
    #[serde(default)]
    pub free_gb: f64,
    #[serde(default)]
    pub tiers: Vec<PriceTier>,
}

impl TransferRates {
    /// Cost of `gb` gigabytes out after the free allowance
    pub fn egress_cost(&self, gb: f64) -> f64 {
        apply_tiered_pricing(billable_after_free_tier(gb, self.free_gb), &self.tiers)
    }
}
