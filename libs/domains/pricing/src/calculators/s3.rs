//! Object storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use super::Rate;
use super::transfer::TransferRates;
use crate::accessor::PricingAccessor;
use crate::error::PricingResult;
use crate::models::{CalculationResult, CostBreakdown};
use crate::normalize::{parse_configuration, rate_for};
use crate::registry::CostModel;

const SERVICE_CODE: &str = "AmazonS3";

fn default_storage_class() -> String {
    "STANDARD".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct S3Configuration {
    /// Storage class key, e.g. `STANDARD`, `STANDARD_IA`, `GLACIER_IR`
    #[serde(default = "default_storage_class")]
    pub storage_class: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub storage_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub put_requests: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub get_requests: f64,
    /// GB read back from infrequent-access classes
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub data_retrieval_gb: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub data_transfer_out_gb: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassRate {
    pub storage: Rate,
    pub put_per_1000: f64,
    pub get_per_1000: f64,
    #[serde(default)]
    pub retrieval_per_gb: f64,
}

/// `storage` category
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3StorageRates {
    pub storage_classes: HashMap<String, StorageClassRate>,
}

pub fn compute(
    config: &S3Configuration,
    rates: &S3StorageRates,
    transfer: Option<&TransferRates>,
) -> PricingResult<CostBreakdown> {
    let class = rate_for(&rates.storage_classes, &config.storage_class, SERVICE_CODE, "storage class")?;

    let requests = config.put_requests / 1000.0 * class.put_per_1000
        + config.get_requests / 1000.0 * class.get_per_1000;

    Ok(CostBreakdown::new()
        .with("storage", class.storage.cost(config.storage_gb))
        .with("requests", requests)
        .with("retrieval", config.data_retrieval_gb * class.retrieval_per_gb)
        .with(
            "dataTransfer",
            transfer.map_or(0.0, |t| t.egress_cost(config.data_transfer_out_gb)),
        ))
}

pub struct S3Model;

#[async_trait]
impl CostModel for S3Model {
    fn service_code(&self) -> &'static str {
        SERVICE_CODE
    }

    fn name(&self) -> &'static str {
        "Amazon S3"
    }

    async fn calculate(
        &self,
        pricing: &PricingAccessor,
        region: &str,
        configuration: Value,
    ) -> PricingResult<CalculationResult> {
        let config: S3Configuration = parse_configuration(SERVICE_CODE, configuration)?;
        let rates: S3StorageRates = pricing.rates(SERVICE_CODE, region, Some("storage")).await?;

        let transfer: Option<TransferRates> = if config.data_transfer_out_gb > 0.0 {
            Some(
                pricing
                    .rates(SERVICE_CODE, region, Some("data-transfer"))
                    .await?,
            )
        } else {
            None
        };

        compute(&config, &rates, transfer.as_ref()).map(CalculationResult::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::sample_accessor;
    use serde_json::json;

    fn rates() -> S3StorageRates {
        serde_json::from_value(json!({
            "storageClasses": {
                "STANDARD": {
                    "storage": [
                        {"upTo": 51200, "pricePerGb": 0.023},
                        {"upTo": 512000, "pricePerGb": 0.022},
                        {"upTo": null, "pricePerGb": 0.021}
                    ],
                    "putPer1000": 0.005,
                    "getPer1000": 0.0004
                },
                "STANDARD_IA": {
                    "storage": 0.0125,
                    "putPer1000": 0.01,
                    "getPer1000": 0.001,
                    "retrievalPerGb": 0.01
                }
            }
        }))
        .unwrap()
    }

    fn config(value: Value) -> S3Configuration {
        parse_configuration(SERVICE_CODE, value).unwrap()
    }

    #[test]
    fn test_standard_storage_crosses_first_tier() {
        let breakdown = compute(&config(json!({"storageGb": 61200})), &rates(), None).unwrap();
        // 51200 × 0.023 + 10000 × 0.022
        assert_eq!(breakdown.get("storage"), Some(1397.6));
    }

    #[test]
    fn test_requests_are_billed_per_thousand() {
        let breakdown = compute(
            &config(json!({"putRequests": 100000, "getRequests": 1000000})),
            &rates(),
            None,
        )
        .unwrap();
        assert_eq!(breakdown.get("requests"), Some(0.9));
    }

    #[test]
    fn test_infrequent_access_retrieval_fee() {
        let breakdown = compute(
            &config(json!({"storageClass": "STANDARD_IA", "storageGb": 1000, "dataRetrievalGb": 50})),
            &rates(),
            None,
        )
        .unwrap();
        assert_eq!(breakdown.get("storage"), Some(12.5));
        assert_eq!(breakdown.get("retrieval"), Some(0.5));
    }

    #[test]
    fn test_unknown_storage_class() {
        let err = compute(&config(json!({"storageClass": "DEEP_SPACE"})), &rates(), None).unwrap_err();
        assert_eq!(err.code(), "rate_not_found");
    }

    #[tokio::test]
    async fn test_with_sample_pricing() {
        let result = S3Model
            .calculate(
                &sample_accessor(),
                "us-east-1",
                json!({"storageGb": 1000, "dataTransferOutGb": 100}),
            )
            .await
            .unwrap();

        assert_eq!(result.cost_breakdown.get("storage"), Some(23.0));
        assert_eq!(result.cost_breakdown.get("dataTransfer"), Some(0.0));
        assert_eq!(result.monthly_cost, 23.0);
    }
}
