//! Elastic load balancing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::{PricingError, PricingResult};
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{default_hours, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AWSELB";

fn default_balancer_type() -> String {
    "application".to_string()
}

fn default_balancers() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerConfiguration {
    /// `application`, `network`, `gateway` or `classic`. Default `application`
    #[serde(default = "default_balancer_type")]
    pub load_balancer_type: String,
    /// Default 1
    #[serde(default = "default_balancers")]
    #[validate(range(min = 0.0))]
    pub load_balancers: f64,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
    /// Average capacity units consumed per balancer-hour
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub capacity_units_per_hour: f64,
    /// GB processed, billed by balancer types without capacity units
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub processed_gb: f64,
}

/// Balancer types bill usage either per capacity-unit-hour or per GB
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancerTypeRate {
    pub hourly: f64,
    #[serde(default)]
    pub capacity_unit_hour: Option<f64>,
    #[serde(default)]
    pub per_gb: Option<f64>,
}

/// `load-balancer` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerRates {
    pub types: HashMap<String, BalancerTypeRate>,
}

pub fn compute(
    config: &LoadBalancerConfiguration,
    rates: &LoadBalancerRates,
) -> PricingResult<CostBreakdown> {
    let rate = rate_for(&rates.types, &config.load_balancer_type, SERVICE_CODE, "load balancer type")?;
    let balancer_hours = config.load_balancers * config.hours_per_month;

    let usage = match (rate.capacity_unit_hour, rate.per_gb) {
        (Some(unit_hour), _) => config.capacity_units_per_hour * balancer_hours * unit_hour,
        (None, Some(per_gb)) => config.processed_gb * per_gb,
        (None, None) => {
            return Err(PricingError::InvalidPricingData {
                service_code: SERVICE_CODE.to_string(),
                reason: format!(
                    "load balancer type '{}' has no usage rate",
                    config.load_balancer_type
                ),
            });
        }
    };

    Ok(CostBreakdown::new()
        .with("hours", balancer_hours * rate.hourly)
        .with("usage", usage))
}

pub struct LoadBalancerModel;

#[async_trait]
impl CostModel for LoadBalancerModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Elastic Load Balancing"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: LoadBalancerConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: LoadBalancerRates = pricing
            .rates(SERVICE_CODE, region, Some("load-balancer"))
            .await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn rates() -> LoadBalancerRates {
        serde_json::from_value(json!({
            "types": {
                "application": {"hourly": 0.0225, "capacityUnitHour": 0.008},
                "classic": {"hourly": 0.025, "perGb": 0.008},
                "broken": {"hourly": 0.01}
            }
        }))
        .unwrap()
    }

    fn config(value: Value) -> LoadBalancerConfiguration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_application_balancer_capacity_units() {
        let breakdown = compute(&config(json!({"capacityUnitsPerHour": 2})), &rates()).unwrap();
        assert_eq!(breakdown.get("hours"), Some(16.43));
        assert_eq!(breakdown.get("usage"), Some(11.68));
    }

    #[test]
    fn test_classic_balancer_processed_gb() {
        let breakdown = compute(
            &config(json!({"loadBalancerType": "classic", "processedGb": 1000, "capacityUnitsPerHour": 5})),
            &rates(),
        )
        .unwrap();
        assert_eq!(breakdown.get("usage"), Some(8.0));
    }

    #[test]
    fn test_type_without_usage_rate_is_bad_data() {
        let err = compute(&config(json!({"loadBalancerType": "broken"})), &rates()).unwrap_err();
        assert_eq!(err.code(), "invalid_pricing_data");
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = LoadBalancerModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"loadBalancerType": "network", "capacityUnitsPerHour": 1}),
            )
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 20.81);
    }
}
