use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::{PricingError, PricingResult};
use crate::rounding::{annualize, round_to_cents};

/// Region used when a request does not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Identifies one pricing document: service, region and optional pricing category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingKey {
    pub service_code: String,
    pub region: String,
    pub category: Option<String>,
}

impl PricingKey {
    /// Build a key; the region is normalized to lowercase
    pub fn new(service_code: &str, region: &str, category: Option<&str>) -> Self {
        Self {
            service_code: service_code.to_string(),
            region: region.trim().to_lowercase(),
            category: category.map(str::to_string),
        }
    }

    /// Cache key in the form `pricing:{serviceCode}:{region}[:{category}]`
    pub fn cache_key(&self) -> String {
        match &self.category {
            Some(category) => format!("pricing:{}:{}:{}", self.service_code, self.region, category),
            None => format!("pricing:{}:{}", self.service_code, self.region),
        }
    }
}

/// A versioned rate table for one (service, region, category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingDocument {
    pub service_code: String,
    pub region: String,
    #[serde(default)]
    pub pricing_category: Option<String>,
    pub effective_date: DateTime<Utc>,
    /// Service-specific nested rate table
    #[schema(value_type = Object)]
    pub rates: serde_json::Value,
}

impl PricingDocument {
    pub fn new(
        service_code: &str,
        region: &str,
        pricing_category: Option<&str>,
        effective_date: DateTime<Utc>,
        rates: serde_json::Value,
    ) -> Self {
        Self {
            service_code: service_code.to_string(),
            region: region.to_lowercase(),
            pricing_category: pricing_category.map(str::to_string),
            effective_date,
            rates,
        }
    }

    /// Whether this document answers a lookup for `key`.
    ///
    /// A key without a category matches documents of any category.
    pub fn matches(&self, key: &PricingKey) -> bool {
        self.service_code == key.service_code
            && self.region.eq_ignore_ascii_case(&key.region)
            && match &key.category {
                Some(category) => self.pricing_category.as_deref() == Some(category.as_str()),
                None => true,
            }
    }

    /// Decode the rate table into a model-specific shape
    pub fn rates<T: DeserializeOwned>(&self) -> PricingResult<T> {
        serde_json::from_value(self.rates.clone()).map_err(|e| PricingError::InvalidPricingData {
            service_code: self.service_code.clone(),
            reason: match &self.pricing_category {
                Some(category) => format!("{} rates: {}", category, e),
                None => e.to_string(),
            },
        })
    }
}

/// One band of a progressive price schedule.
///
/// `up_to` is the cumulative upper bound of the band; `None` means unbounded.
/// Rate tables name the unit price differently per service category, so
/// either `pricePerGb` or `pricePerUnit` may carry it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    #[serde(default)]
    pub up_to: Option<f64>,
    #[serde(default, alias = "pricePerGB")]
    pub price_per_gb: Option<f64>,
    #[serde(default)]
    pub price_per_unit: Option<f64>,
}

impl PriceTier {
    pub fn per_gb(up_to: Option<f64>, price: f64) -> Self {
        Self {
            up_to,
            price_per_gb: Some(price),
            price_per_unit: None,
        }
    }

    pub fn per_unit(up_to: Option<f64>, price: f64) -> Self {
        Self {
            up_to,
            price_per_gb: None,
            price_per_unit: Some(price),
        }
    }

    /// Whichever rate field is populated, defaulting to zero
    pub fn unit_price(&self) -> f64 {
        self.price_per_gb.or(self.price_per_unit).unwrap_or(0.0)
    }
}

/// Cost per category, each amount rounded to cents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct CostBreakdown(BTreeMap<String, f64>);

impl CostBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, rounding the amount to cents and clamping negatives to zero
    pub fn with(mut self, category: &str, amount: f64) -> Self {
        self.insert(category, amount);
        self
    }

    pub fn insert(&mut self, category: &str, amount: f64) {
        self.0
            .insert(category.to_string(), round_to_cents(amount.max(0.0)));
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> f64 {
        round_to_cents(self.0.values().sum())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of evaluating one service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub cost_breakdown: CostBreakdown,
    pub monthly_cost: f64,
    pub annual_cost: f64,
}

impl CalculationResult {
    /// Derive monthly and annual totals from an already-rounded breakdown
    pub fn from_breakdown(cost_breakdown: CostBreakdown) -> Self {
        let monthly_cost = cost_breakdown.total();
        Self {
            cost_breakdown,
            monthly_cost,
            annual_cost: annualize(monthly_cost),
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// A single calculation request as received from the outer layers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub service_code: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Service-specific usage configuration
    #[serde(default)]
    #[schema(value_type = Object)]
    pub configuration: serde_json::Value,
}

impl CalculationRequest {
    pub fn new(service_code: &str, region: &str, configuration: serde_json::Value) -> Self {
        Self {
            service_code: service_code.to_string(),
            region: region.to_string(),
            configuration,
        }
    }
}

/// Batch request body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchCalculationRequest {
    pub items: Vec<CalculationRequest>,
}

/// Why a batch item failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemError {
    /// Machine-readable error code (e.g. `unsupported_service`)
    pub kind: String,
    /// Human-readable reason
    pub message: String,
}

impl From<&PricingError> for BatchItemError {
    fn from(err: &PricingError) -> Self {
        Self {
            kind: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// One batch entry, tagged with the service it was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchItemResult {
    Success {
        #[serde(rename = "serviceCode")]
        service_code: String,
        result: CalculationResult,
    },
    Error {
        #[serde(rename = "serviceCode")]
        service_code: String,
        error: BatchItemError,
    },
}

impl BatchItemResult {
    pub fn success(service_code: &str, result: CalculationResult) -> Self {
        BatchItemResult::Success {
            service_code: service_code.to_string(),
            result,
        }
    }

    pub fn failure(service_code: &str, err: &PricingError) -> Self {
        BatchItemResult::Error {
            service_code: service_code.to_string(),
            error: err.into(),
        }
    }

    pub fn service_code(&self) -> &str {
        match self {
            BatchItemResult::Success { service_code, .. }
            | BatchItemResult::Error { service_code, .. } => service_code,
        }
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            BatchItemResult::Success { result, .. } => Some(result),
            BatchItemResult::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&BatchItemError> {
        match self {
            BatchItemResult::Success { .. } => None,
            BatchItemResult::Error { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result().is_some()
    }
}

/// Results for a batch in input order, plus totals over the successful items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub items: Vec<BatchItemResult>,
    pub total_monthly_cost: f64,
    pub total_annual_cost: f64,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchResult {
    /// Aggregate item results; failed items contribute nothing to the totals
    pub fn from_items(items: Vec<BatchItemResult>) -> Self {
        let (monthly, annual) = items
            .iter()
            .filter_map(BatchItemResult::result)
            .fold((0.0, 0.0), |(m, a), r| (m + r.monthly_cost, a + r.annual_cost));
        let succeeded = items.iter().filter(|i| i.is_success()).count();
        let failed = items.len() - succeeded;

        Self {
            items,
            total_monthly_cost: round_to_cents(monthly),
            total_annual_cost: round_to_cents(annual),
            succeeded,
            failed,
        }
    }
}

/// Capability descriptor for a supported service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub service_code: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_key_format() {
        let key = PricingKey::new("AmazonEC2", "US-East-1", Some("compute"));
        assert_eq!(key.cache_key(), "pricing:AmazonEC2:us-east-1:compute");

        let key = PricingKey::new("AmazonEC2", "us-east-1", None);
        assert_eq!(key.cache_key(), "pricing:AmazonEC2:us-east-1");
    }

    #[test]
    fn test_document_matching_ignores_category_when_unspecified() {
        let doc = PricingDocument::new(
            "AmazonS3",
            "us-east-1",
            Some("storage"),
            Utc::now(),
            json!({}),
        );
        assert!(doc.matches(&PricingKey::new("AmazonS3", "us-east-1", None)));
        assert!(doc.matches(&PricingKey::new("AmazonS3", "us-east-1", Some("storage"))));
        assert!(!doc.matches(&PricingKey::new("AmazonS3", "us-east-1", Some("data-transfer"))));
        assert!(!doc.matches(&PricingKey::new("AmazonS3", "eu-west-1", None)));
    }

    #[test]
    fn test_tier_reads_either_price_field() {
        let tiers: Vec<PriceTier> = serde_json::from_value(json!([
            {"upTo": 10, "pricePerGB": 0.09},
            {"upTo": null, "pricePerUnit": 0.05},
            {}
        ]))
        .unwrap();

        assert_eq!(tiers[0].unit_price(), 0.09);
        assert_eq!(tiers[1].unit_price(), 0.05);
        assert_eq!(tiers[1].up_to, None);
        assert_eq!(tiers[2].unit_price(), 0.0);
    }

    #[test]
    fn test_breakdown_rounds_and_clamps() {
        let breakdown = CostBreakdown::new()
            .with("compute", 10.004)
            .with("storage", -3.0);

        assert_eq!(breakdown.get("compute"), Some(10.0));
        assert_eq!(breakdown.get("storage"), Some(0.0));
    }

    #[test]
    fn test_result_annualizes_rounded_monthly() {
        let result = CalculationResult::from_breakdown(
            CostBreakdown::new().with("compute", 146.0).with("storage", 0.333),
        );
        assert_eq!(result.monthly_cost, 146.33);
        assert_eq!(result.annual_cost, 1755.96);
    }

    #[test]
    fn test_malformed_rates_report_service() {
        let doc = PricingDocument::new("AWSLambda", "us-east-1", None, Utc::now(), json!([1, 2]));
        let err = doc.rates::<std::collections::HashMap<String, f64>>().unwrap_err();
        assert_eq!(err.code(), "invalid_pricing_data");
        assert!(err.to_string().contains("AWSLambda"));
    }

    #[test]
    fn test_batch_item_serializes_with_status_tag() {
        let item = BatchItemResult::failure("Foo", &PricingError::UnsupportedService("Foo".into()));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["serviceCode"], "Foo");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "unsupported_service");
    }
}
