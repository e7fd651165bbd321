//! Block volume pricing shared by the instance and block-storage models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::Rate;
use crate::error::PricingResult;
use crate::normalize::{billable_after_free_tier, default_one, rate_for};

fn default_volume_type() -> String {
    "gp3".to_string()
}

/// One attached volume (or a group of identical volumes)
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VolumeConfiguration {
    /// Volume type key, e.g. `gp3`, `io2`, `st1`. Default `gp3`
    #[serde(default = "default_volume_type")]
    pub volume_type: String,
    #[validate(range(min = 0.0))]
    pub size_gb: f64,
    /// Provisioned IOPS; only the amount above the type's baseline is billed
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub iops: f64,
    /// Provisioned throughput in MB/s; only the amount above baseline is billed
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub throughput_mbps: f64,
    /// Number of identical volumes. Default 1
    #[serde(default = "default_one")]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeTypeRate {
    /// Per GB-month, flat or tiered
    pub storage: Rate,
    #[serde(default)]
    pub included_iops: f64,
    #[serde(default)]
    pub price_per_iops: f64,
    #[serde(default)]
    pub included_throughput_mbps: f64,
    #[serde(default)]
    pub price_per_mbps: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRates {
    pub volume_types: HashMap<String, VolumeTypeRate>,
    #[serde(default)]
    pub snapshot_per_gb_month: f64,
}

impl VolumeRates {
    /// Monthly cost of a volume group: capacity plus IOPS and throughput above baseline
    pub fn volume_cost(&self, service_code: &str, volume: &VolumeConfiguration) -> PricingResult<f64> {
        let rate = rate_for(&self.volume_types, &volume.volume_type, service_code, "volume type")?;

        let storage = rate.storage.cost(volume.size_gb);
        let iops = billable_after_free_tier(volume.iops, rate.included_iops) * rate.price_per_iops;
        let throughput = billable_after_free_tier(volume.throughput_mbps, rate.included_throughput_mbps)
            * rate.price_per_mbps;

        Ok((storage + iops + throughput) * f64::from(volume.count))
    }

    pub fn volumes_cost(
        &self,
        service_code: &str,
        volumes: &[VolumeConfiguration],
    ) -> PricingResult<f64> {
        volumes
            .iter()
            .map(|v| self.volume_cost(service_code, v))
            .sum()
    }

    pub fn snapshot_cost(&self, snapshot_gb: f64) -> f64 {
        snapshot_gb.max(0.0) * self.snapshot_per_gb_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rates() -> VolumeRates {
        serde_json::from_value(json!({
            "volumeTypes": {
                "gp3": {
                    "storage": 0.08,
                    "includedIops": 3000,
                    "pricePerIops": 0.005,
                    "includedThroughputMbps": 125,
                    "pricePerMbps": 0.04
                }
            },
            "snapshotPerGbMonth": 0.05
        }))
        .unwrap()
    }

    fn volume(iops: f64, throughput_mbps: f64, count: u32) -> VolumeConfiguration {
        VolumeConfiguration {
            volume_type: "gp3".to_string(),
            size_gb: 100.0,
            iops,
            throughput_mbps,
            count,
        }
    }

    #[test]
    fn test_baseline_performance_is_free() {
        let cost = rates().volume_cost("AmazonEBS", &volume(3000.0, 125.0, 1)).unwrap();
        assert!((cost - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_above_baseline_is_billed_per_volume() {
        let cost = rates().volume_cost("AmazonEBS", &volume(4000.0, 225.0, 2)).unwrap();
        // (8 + 1000 × 0.005 + 100 × 0.04) × 2
        assert!((cost - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_volume_type() {
        let mut v = volume(0.0, 0.0, 1);
        v.volume_type = "gp9".to_string();
        let err = rates().volume_cost("AmazonEBS", &v).unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
        assert!(err.to_string().contains("gp9"));
    }
}
