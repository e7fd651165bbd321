//! Network plumbing billed per hour and per GB.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{default_hours, parse_configuration};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonVPC";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfiguration {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub nat_gateways: f64,
    /// GB processed by all NAT gateways
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub nat_processed_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub vpn_connections: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub public_ipv4_addresses: f64,
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
}

/// `networking` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcRates {
    pub nat_gateway_hourly: f64,
    pub nat_per_gb: f64,
    pub vpn_connection_hourly: f64,
    pub public_ipv4_hourly: f64,
}

pub fn compute(config: &VpcConfiguration, rates: &VpcRates) -> CostBreakdown {
    let hours = config.hours_per_month;
    CostBreakdown::new()
        .with(
            "natGateway",
            config.nat_gateways * hours * rates.nat_gateway_hourly + config.nat_processed_gb * rates.nat_per_gb,
        )
        .with("vpn", config.vpn_connections * hours * rates.vpn_connection_hourly)
        .with(
            "publicIpv4",
            config.public_ipv4_addresses * hours * rates.public_ipv4_hourly,
        )
}

pub struct VpcModel;

#[async_trait]
impl CostModel for VpcModel {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon VPC"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: VpcConfiguration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: VpcRates = pricing.rates(SERVICE_CODE, region, Some("networking")).await?;
        Ok(CalculationResult::from_breakdown(compute(&config, &rates)))
    }
}
