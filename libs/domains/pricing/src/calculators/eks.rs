//! Managed Kubernetes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{default_hours, default_one, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonEKS";

fn default_support_tier() -> String {
    "standard".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroup {
    pub instance_type: String,
    #[serde(default = "default_one")]
    pub node_count: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EksConfiguration {
    #[serde(default = "default_one")]
    pub clusters: u32,
    /// `standard` or `extended`. Default `standard`
    #[serde(default = "default_support_tier")]
    pub support_tier: String,
    #[serde(default)]
    #[validate(nested)]
    pub node_groups: Vec<NodeGroup>,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
}

/// `cluster` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EksRates {
    /// Control plane hourly price per support tier
    pub control_plane: HashMap<String, f64>,
    /// Worker node hourly price per instance type
    pub instance_types: HashMap<String, f64>,
}

pub fn compute(config: &EksConfiguration, rates: &EksRates) -> PricingResult<CostBreakdown> {
    let control_plane = rate_for(&rates.control_plane, &config.support_tier, SERVICE_CODE, "support tier")?
        * f64::from(config.clusters)
        * config.hours_per_month;

    let mut nodes = 0.0;
    for group in &config.node_groups {
        let hourly = rate_for(&rates.instance_types, &group.instance_type, SERVICE_CODE, "instance type")?;
        nodes += hourly * f64::from(group.node_count) * config.hours_per_month;
    }

    Ok(CostBreakdown::new()
        .with("controlPlane", control_plane)
        .with("nodes", nodes))
}

pub struct EksModel;

#[async_trait]
impl CostModel for EksModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon EKS"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: EksConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: EksRates = pricing.rates(SERVICE_CODE, region, Some("cluster")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn rates() -> EksRates {
        serde_json::from_value(json!({
            "controlPlane": {"standard": 0.10, "extended": 0.60},
            "instanceTypes": {"m5.large": 0.096, "t3.medium": 0.0416}
        }))
        .unwrap()
    }

    fn config(value: Value) -> EksConfiguration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_control_plane_by_support_tier() {
        let standard = compute(&config(json!({})), &rates()).unwrap();
        let extended = compute(&config(json!({"supportTier": "extended"})), &rates()).unwrap();
        assert_eq!(standard.get("controlPlane"), Some(73.0));
        assert_eq!(extended.get("controlPlane"), Some(438.0));
    }

    #[test]
    fn test_node_groups() {
        let breakdown = compute(
            &config(json!({"nodeGroups": [
                {"instanceType": "m5.large", "nodeCount": 3},
                {"instanceType": "t3.medium"}
            ]})),
            &rates(),
        )
        .unwrap();
        // (0.096 × 3 + 0.0416) × 730
        assert_eq!(breakdown.get("nodes"), Some(240.61));
    }

    #[test]
    fn test_unknown_node_instance_type() {
        let err = compute(
            &config(json!({"nodeGroups": [{"instanceType": "z1.galactic"}]})),
            &rates(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = EksModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"nodeGroups": [{"instanceType": "m5.large", "nodeCount": 2}]}),
            )
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 213.16);
    }
}
