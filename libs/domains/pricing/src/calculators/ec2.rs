//! Compute instances.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use super::transfer::TransferRates;
use super::volumes::{VolumeConfiguration, VolumeRates};
use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{default_hours, default_one, parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonEC2";

/// Purchase option billed at list price
pub const ON_DEMAND: &str = "on-demand";

fn default_operating_system() -> String {
    "linux".to_string()
}

fn default_tenancy() -> String {
    "shared".to_string()
}

fn default_purchase_option() -> String {
    ON_DEMAND.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ec2Configuration {
    pub instance_type: String,
    /// Default `linux`
    #[serde(default = "default_operating_system")]
    pub operating_system: String,
    /// `shared`, `dedicated` or `host`. Default `shared`
    #[serde(default = "default_tenancy")]
    pub tenancy: String,
    /// `on-demand` or a commitment such as `reserved-1yr`, `savings-plan-3yr`
    #[serde(default = "default_purchase_option")]
    pub purchase_option: String,
    #[serde(default = "default_one")]
    pub instance_count: u32,
    /// Running hours per month. Default 730
    #[serde(default = "default_hours")]
    #[validate(range(min = 0.0, max = 744.0))]
    pub hours_per_month: f64,
    #[serde(default)]
    #[validate(nested)]
    pub volumes: Vec<VolumeConfiguration>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub data_transfer_out_gb: f64,
}

/// `compute` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2ComputeRates {
    /// Hourly on-demand price per instance type
    pub instance_types: HashMap<String, f64>,
    pub operating_systems: HashMap<String, f64>,
    pub tenancy: HashMap<String, f64>,
    /// Fractional discount per commitment, e.g. 0.4
    #[serde(default)]
    pub purchase_options: HashMap<String, f64>,
}

pub fn compute_cost(config: &Ec2Configuration, rates: &Ec2ComputeRates) -> PricingResult<f64> {
    let hourly = rate_for(&rates.instance_types, &config.instance_type, SERVICE_CODE, "instance type")?;
    let os = rate_for(
        &rates.operating_systems,
        &config.operating_system,
        SERVICE_CODE,
        "operating system",
    )?;
    let tenancy = rate_for(&rates.tenancy, &config.tenancy, SERVICE_CODE, "tenancy")?;
    let discount = if config.purchase_option.eq_ignore_ascii_case(ON_DEMAND) {
        0.0
    } else {
        *rate_for(
            &rates.purchase_options,
            &config.purchase_option,
            SERVICE_CODE,
            "purchase option",
        )?
    };

    Ok(hourly
        * os
        * tenancy
        * (1.0 - discount)
        * config.hours_per_month
        * f64::from(config.instance_count))
}

pub struct Ec2Model;

#[async_trait]
impl CostModel for Ec2Model {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon EC2"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: Ec2Configuration = parse_configuration(SERVICE_CODE, configuration)?;

        let compute_rates: Ec2ComputeRates = pricing.rates(SERVICE_CODE, region, Some("compute")).await?;
        let compute = compute_cost(&config, &compute_rates)?;

        let storage = if config.volumes.is_empty() {
            0.0
        } else {
            let rates: VolumeRates = pricing.rates(SERVICE_CODE, region, Some("storage")).await?;
            rates.volumes_cost(SERVICE_CODE, &config.volumes)?
        };

        let data_transfer = if config.data_transfer_out_gb > 0.0 {
            let rates: TransferRates = pricing
                .rates(SERVICE_CODE, region, Some("data-transfer"))
                .await?;
            rates.egress_cost(config.data_transfer_out_gb)
        } else {
            0.0
        };

        Ok(CalculationResult::from_breakdown(
            CostBreakdown::new()
                .with("compute", compute)
                .with("storage", storage)
                .with("dataTransfer", data_transfer),
        ))
    }
}
