//! Managed API endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown, PriceTier};
use crate::normalize::{chunks, default_hours, parse_configuration, per_million, rate_for};
use crate::registry::CostModel;
use crate::tiered::apply_tiered_pricing;

const SERVICE_CODE: &str = "AmazonApiGateway";

/// WebSocket payload size billed as one message
pub const WEBSOCKET_CHUNK_KB: f64 = 32.0;

fn default_api_type() -> String {
    "rest".to_string()
}

fn default_websocket_message_kb() -> f64 {
    WEBSOCKET_CHUNK_KB
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayConfiguration {
    /// `rest` or `http`. Default `rest`
    #[serde(default = "default_api_type")]
    pub api_type: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub requests: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub websocket_messages: f64,
    /// Default 32
    #[serde(default = "default_websocket_message_kb")]
    #[validate(range(min = 0.0, max = 128.0))]
    pub websocket_message_size_kb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub connection_minutes: f64,
    /// Cache size key in GB (`0.5`, `1.6`, `6.1`, ...); no cache when absent
    #[serde(default)]
    pub cache_size_gb: Option<String>,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
}

/// `requests` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRates {
    /// Per-million tiers per API type, bounds in millions of requests
    pub request_tiers: HashMap<String, Vec<PriceTier>>,
    pub websocket_message_tiers: Vec<PriceTier>,
    pub connection_minutes_per_million: f64,
    /// Hourly price per cache size
    pub cache_hourly: HashMap<String, f64>,
}

pub fn compute(
    config: &ApiGatewayConfiguration,
    rates: &ApiGatewayRates,
) -> PricingResult<CostBreakdown> {
    let tiers = rate_for(&rates.request_tiers, &config.api_type, SERVICE_CODE, "API type")?;
    let requests = apply_tiered_pricing(per_million(config.requests), tiers);

    let messages = config.websocket_messages * chunks(config.websocket_message_size_kb, WEBSOCKET_CHUNK_KB);
    let websocket = apply_tiered_pricing(per_million(messages), &rates.websocket_message_tiers)
        + per_million(config.connection_minutes) * rates.connection_minutes_per_million;

    let cache = match &config.cache_size_gb {
        Some(size) => {
            rate_for(&rates.cache_hourly, size, SERVICE_CODE, "cache size")? * config.hours_per_month
        }
        None => 0.0,
    };

    Ok(CostBreakdown::new()
        .with("requests", requests)
        .with("websocket", websocket)
        .with("cache", cache))
}

pub struct ApiGatewayModel;

#[async_trait]
impl CostModel for ApiGatewayModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon API Gateway"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: ApiGatewayConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: ApiGatewayRates = pricing.rates(SERVICE_CODE, region, Some("requests")).await?;
        compute(&config, &rates).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn rates() -> ApiGatewayRates {
        serde_json::from_value(json!({
            "requestTiers": {
                "rest": [
                    {"upTo": 333, "pricePerUnit": 3.50},
                    {"upTo": 1000, "pricePerUnit": 2.80},
                    {"upTo": null, "pricePerUnit": 2.38}
                ],
                "http": [
                    {"upTo": 300, "pricePerUnit": 1.00},
                    {"upTo": null, "pricePerUnit": 0.90}
                ]
            },
            "websocketMessageTiers": [
                {"upTo": 1000, "pricePerUnit": 1.00},
                {"upTo": null, "pricePerUnit": 0.80}
            ],
            "connectionMinutesPerMillion": 0.25,
            "cacheHourly": {"0.5": 0.02, "1.6": 0.038}
        }))
        .unwrap()
    }

    fn config(value: Value) -> ApiGatewayConfiguration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_rest_vs_http_requests() {
        let rest = compute(&config(json!({"requests": 10000000})), &rates()).unwrap();
        let http = compute(&config(json!({"apiType": "http", "requests": 10000000})), &rates()).unwrap();
        assert_eq!(rest.get("requests"), Some(35.0));
        assert_eq!(http.get("requests"), Some(10.0));
    }

    #[test]
    fn test_websocket_messages_in_32kb_chunks() {
        let breakdown = compute(
            &config(json!({
                "websocketMessages": 1000000,
                "websocketMessageSizeKb": 40,
                "connectionMinutes": 4000000
            })),
            &rates(),
        )
        .unwrap();
        // 2M messages + 4M connection minutes
        assert_eq!(breakdown.get("websocket"), Some(3.0));
    }

    #[test]
    fn test_cache_by_size() {
        let breakdown = compute(&config(json!({"cacheSizeGb": "0.5"})), &rates()).unwrap();
        assert_eq!(breakdown.get("cache"), Some(14.6));

        let err = compute(&config(json!({"cacheSizeGb": "3.0"})), &rates()).unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = ApiGatewayModel
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"apiType": "http", "requests": 10000000}),
            )
            .await
            .unwrap();
        assert_eq!(result.monthly_cost, 10.0);
    }
}
