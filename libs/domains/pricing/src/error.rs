use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while estimating cost
#[derive(Debug, Error)]
pub enum PricingError {
    /// No cost model is registered for the service code
    #[error("Service '{0}' is not supported yet")]
    UnsupportedService(String),

    /// The pricing store has no document for the service/region (and category)
    #[error("{}", pricing_not_found_message(.service_code, .region, .category))]
    PricingNotFound {
        service_code: String,
        region: String,
        category: Option<String>,
    },

    /// A configuration value names a key the fetched rate table does not contain
    #[error("No rate found for {kind} '{key}' in {service_code}")]
    RateNotFound {
        service_code: String,
        kind: String,
        key: String,
    },

    /// Configuration failed shape or range validation
    #[error("Invalid configuration for {service_code}: {reason}")]
    InvalidConfiguration {
        service_code: String,
        reason: String,
    },

    /// A stored rate table does not match the shape the cost model expects
    #[error("Malformed pricing data for {service_code}: {reason}")]
    InvalidPricingData {
        service_code: String,
        reason: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn pricing_not_found_message(service_code: &str, region: &str, category: &Option<String>) -> String {
    match category {
        Some(category) => format!(
            "Pricing data not found for {} ({}) in region {}",
            service_code, category, region
        ),
        None => format!(
            "Pricing data not found for {} in region {}",
            service_code, region
        ),
    }
}

impl PricingError {
    /// Shorthand for a missing rate-table entry
    pub fn rate_not_found(
        service_code: impl Into<String>,
        kind: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        PricingError::RateNotFound {
            service_code: service_code.into(),
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Shorthand for a rejected configuration
    pub fn invalid_configuration(service_code: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidConfiguration {
            service_code: service_code.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable error code, used in API bodies and batch items
    pub fn code(&self) -> &'static str {
        match self {
            PricingError::UnsupportedService(_) => "unsupported_service",
            PricingError::PricingNotFound { .. } => "pricing_not_found",
            PricingError::RateNotFound { .. } => "rate_not_found",
            PricingError::InvalidConfiguration { .. } => "invalid_configuration",
            PricingError::InvalidPricingData { .. } => "invalid_pricing_data",
            PricingError::Database(_) => "database_error",
            PricingError::Internal(_) => "internal_error",
        }
    }

    /// Whether the caller can fix the request themselves
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PricingError::UnsupportedService(_)
                | PricingError::RateNotFound { .. }
                | PricingError::InvalidConfiguration { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PricingError::UnsupportedService(_) => StatusCode::NOT_IMPLEMENTED,
            PricingError::PricingNotFound { .. } => StatusCode::NOT_FOUND,
            PricingError::RateNotFound { .. } | PricingError::InvalidConfiguration { .. } => {
                StatusCode::BAD_REQUEST
            }
            PricingError::InvalidPricingData { .. }
            | PricingError::Database(_)
            | PricingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unreadable request bodies are reported in the same shape as other
/// configuration errors, always with status 400.
impl From<JsonRejection> for PricingError {
    fn from(rejection: JsonRejection) -> Self {
        PricingError::invalid_configuration("request body", rejection.body_text())
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            PricingError::Database(_) => "Database error".to_string(),
            PricingError::Internal(_) => "Internal error".to_string(),
            _ => self.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Cost calculation failed");
        }

        let body = Json(json!({
            "error": message,
            "code": status.as_u16(),
            "kind": self.code(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_not_found_names_service_and_region() {
        let err = PricingError::PricingNotFound {
            service_code: "AmazonEC2".to_string(),
            region: "eu-west-1".to_string(),
            category: None,
        };
        let message = err.to_string();
        assert!(message.contains("AmazonEC2"));
        assert!(message.contains("eu-west-1"));
    }

    #[test]
    fn test_pricing_not_found_includes_category() {
        let err = PricingError::PricingNotFound {
            service_code: "AmazonEC2".to_string(),
            region: "us-east-1".to_string(),
            category: Some("storage".to_string()),
        };
        assert!(err.to_string().contains("(storage)"));
    }

    #[test]
    fn test_rate_not_found_names_missing_key() {
        let err = PricingError::rate_not_found("AmazonEC2", "instance type", "x9.huge");
        assert_eq!(
            err.to_string(),
            "No rate found for instance type 'x9.huge' in AmazonEC2"
        );
        assert_eq!(err.code(), "rate_not_found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PricingError::UnsupportedService("Foo".into()).status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            PricingError::invalid_configuration("AWSLambda", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PricingError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_errors_are_distinguished() {
        assert!(PricingError::UnsupportedService("Foo".into()).is_client_error());
        assert!(!PricingError::Internal("boom".into()).is_client_error());
    }
}
