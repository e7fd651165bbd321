//! Block storage volumes and snapshots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::volumes::{VolumeConfiguration, VolumeRates};
use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::parse_configuration;
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonEBS";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EbsConfiguration {
    #[serde(default)]
    #[validate(nested)]
    pub volumes: Vec<VolumeConfiguration>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub snapshot_gb: f64,
}

pub fn compute(config: &EbsConfiguration, rates: &VolumeRates) -> PricingResult<CostBreakdown> {
    Ok(CostBreakdown::new()
        .with("storage", rates.volumes_cost(SERVICE_CODE, &config.volumes)?)
        .with("snapshots", rates.snapshot_cost(config.snapshot_gb)))
}

pub struct EbsModel;

#[async_trait]
impl CostModel for EbsModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon EBS"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: EbsConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: VolumeRates = pricing.rates(SERVICE_CODE, region, Some("storage")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    #[tokio::test]
    async fn test_volumes_and_snapshots() {
        let result = EbsModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({
                    "volumes": [
                        {"volumeType": "gp3", "sizeGb": 500, "iops": 6000, "throughputMbps": 250},
                        {"volumeType": "st1", "sizeGb": 1000, "count": 2}
                    ],
                    "snapshotGb": 200
                }),
            )
            .await
            .unwrap();

        // gp3: 40 + 3000 × 0.005 + 125 × 0.04 = 60; st1: 45 × 2
        assert_eq!(result.cost_breakdown.get("storage"), Some(150.0));
        assert_eq!(result.cost_breakdown.get("snapshots"), Some(10.0));
        assert_eq!(result.monthly_cost, 160.0);
    }

    #[tokio::test]
    async fn test_unknown_volume_type_surfaces() {
        let err = EbsModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"volumes": [{"volumeType": "floppy", "sizeGb": 1}]}),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
    }

    #[tokio::test]
    async fn test_negative_size_is_invalid() {
        let err = EbsModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"volumes": [{"sizeGb": -5}]}),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_configuration");
    }
}
