//! DNS.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown, PriceTier};
use crate::normalize::{parse_configuration, per_million, rate_for};
use crate::registry::CostModel;
use crate::tiered::apply_tiered_pricing;

const SERVICE_CODE: &str = "AmazonRoute53";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Route53Configuration {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub hosted_zones: f64,
    /// Monthly queries per routing type (`standard`, `latency`, `geo`, ...)
    #[serde(default)]
    pub queries: BTreeMap<String, f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub health_checks: f64,
}

/// `dns` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route53Rates {
    pub hosted_zone_tiers: Vec<PriceTier>,
    /// Per-million tiers, bounds expressed in millions of queries
    pub query_tiers: HashMap<String, Vec<PriceTier>>,
    pub health_check_per_month: f64,
}

pub fn compute(config: &Route53Configuration, rates: &Route53Rates) -> PricingResult<CostBreakdown> {
    let mut queries = 0.0;
    for (routing_type, count) in &config.queries {
        let tiers = rate_for(&rates.query_tiers, routing_type, SERVICE_CODE, "routing type")?;
        queries += apply_tiered_pricing(per_million(count.max(0.0)), tiers);
    }

    Ok(CostBreakdown::new()
        .with(
            "hostedZones",
            apply_tiered_pricing(config.hosted_zones, &rates.hosted_zone_tiers),
        )
        .with("queries", queries)
        .with("healthChecks", config.health_checks * rates.health_check_per_month))
}

pub struct Route53Model;

#[async_trait]
impl CostModel for Route53Model {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon Route 53"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: Route53Configuration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: Route53Rates = pricing.rates(SERVICE_CODE, region, Some("dns")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn rates() -> Route53Rates {
        serde_json::from_value(json!({
            "hostedZoneTiers": [
                {"upTo": 25, "pricePerUnit": 0.50},
                {"upTo": null, "pricePerUnit": 0.10}
            ],
            "queryTiers": {
                "standard": [
                    {"upTo": 1000, "pricePerUnit": 0.40},
                    {"upTo": null, "pricePerUnit": 0.20}
                ],
                "latency": [
                    {"upTo": 1000, "pricePerUnit": 0.60},
                    {"upTo": null, "pricePerUnit": 0.30}
                ]
            },
            "healthCheckPerMonth": 0.50
        }))
        .unwrap()
    }

    fn config(value: Value) -> Route53Configuration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_hosted_zone_tiers() {
        let breakdown = compute(&config(json!({"hostedZones": 30})), &rates()).unwrap();
        assert_eq!(breakdown.get("hostedZones"), Some(13.0));
    }

    #[test]
    fn test_queries_by_routing_type() {
        let breakdown = compute(
            &config(json!({"queries": {"standard": 10000000, "latency": 5000000}})),
            &rates(),
        )
        .unwrap();
        assert_eq!(breakdown.get("queries"), Some(7.0));
    }

    #[test]
    fn test_unknown_routing_type() {
        let err = compute(&config(json!({"queries": {"weighted-magic": 1}})), &rates()).unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = Route53Model
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"hostedZones": 2, "queries": {"standard": 1000000}, "healthChecks": 2}),
            )
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 2.4);
    }
}
