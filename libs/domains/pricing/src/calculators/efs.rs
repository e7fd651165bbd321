//! Shared file storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{billable_after_free_tier, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonEFS";

fn default_storage_class() -> String {
    "standard".to_string()
}

fn default_availability() -> String {
    "regional".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EfsConfiguration {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub storage_gb: f64,
    /// `standard`, `infrequent-access` or `archive`. Default `standard`
    #[serde(default = "default_storage_class")]
    pub storage_class: String,
    /// `regional` or `one-zone`. Default `regional`
    #[serde(default = "default_availability")]
    pub availability: String,
    /// GB read from infrequent-access or archive storage
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub infrequent_access_read_gb: f64,
    /// Provisioned throughput in MB/s; zero means bursting
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub provisioned_throughput_mbps: f64,
}

/// `storage` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfsRates {
    /// availability → storage class → per GB-month
    pub storage: HashMap<String, HashMap<String, f64>>,
    pub ia_access_per_gb: f64,
    pub provisioned_throughput_per_mbps_month: f64,
    /// Throughput earned by stored data, in MB/s per TB
    pub baseline_mbps_per_tb: f64,
}

pub fn compute(config: &EfsConfiguration, rates: &EfsRates) -> PricingResult<CostBreakdown> {
    let classes = rate_for(&rates.storage, &config.availability, SERVICE_CODE, "availability")?;
    let per_gb = rate_for(classes, &config.storage_class, SERVICE_CODE, "storage class")?;

    let baseline_mbps = config.storage_gb / 1024.0 * rates.baseline_mbps_per_tb;
    let throughput = billable_after_free_tier(config.provisioned_throughput_mbps, baseline_mbps)
        * rates.provisioned_throughput_per_mbps_month;

    Ok(CostBreakdown::new()
        .with("storage", config.storage_gb * per_gb)
        .with("access", config.infrequent_access_read_gb * rates.ia_access_per_gb)
        .with("throughput", throughput))
}

pub struct EfsModel;

#[async_trait]
impl CostModel for EfsModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon EFS"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: EfsConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: EfsRates = pricing.rates(SERVICE_CODE, region, Some("storage")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn rates() -> EfsRates {
        serde_json::from_value(json!({
            "storage": {
                "regional": {"standard": 0.30, "infrequent-access": 0.016, "archive": 0.008},
                "one-zone": {"standard": 0.16, "infrequent-access": 0.0133}
            },
            "iaAccessPerGb": 0.01,
            "provisionedThroughputPerMbpsMonth": 6.0,
            "baselineMbpsPerTb": 50
        }))
        .unwrap()
    }

    fn config(value: Value) -> EfsConfiguration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_storage_by_availability_and_class() {
        let regional = compute(&config(json!({"storageGb": 100})), &rates()).unwrap();
        let one_zone = compute(&config(json!({"storageGb": 100, "availability": "one-zone"})), &rates()).unwrap();
        assert_eq!(regional.get("storage"), Some(30.0));
        assert_eq!(one_zone.get("storage"), Some(16.0));
    }

    #[test]
    fn test_provisioned_throughput_beyond_earned_baseline() {
        // 2 TB earns 100 MB/s
        let breakdown = compute(
            &config(json!({"storageGb": 2048, "provisionedThroughputMbps": 150})),
            &rates(),
        )
        .unwrap();
        assert_eq!(breakdown.get("throughput"), Some(300.0));
    }

    #[test]
    fn test_unknown_class_for_availability() {
        let err = compute(
            &config(json!({"availability": "one-zone", "storageClass": "archive"})),
            &rates(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
        assert!(err.to_string().contains("archive"));
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = EfsModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"storageGb": 500, "storageClass": "infrequent-access", "infrequentAccessReadGb": 100}),
            )
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 9.0);
    }
}
