//! Metrics for the cost estimator.
//!
//! - Prometheus recorder installation and the `/metrics` handler
//! - [`PricingMetrics`] for calculations, batches, cache and store lookups
//! - [`middleware::http_metrics`] for per-route HTTP counters
//!
//! ```rust,ignore
//! observability::init_metrics()?;
//!
//! let app = Router::new()
//!     .route("/metrics", get(observability::metrics_handler))
//!     .layer(axum::middleware::from_fn(observability::middleware::http_metrics));
//! ```

pub mod middleware;
pub mod pricing;

pub use pricing::{CalculationTimer, PricingMetrics};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once; later calls return the same handle
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        describe_metrics();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `/metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn describe_metrics() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "HTTP requests answered with a 4xx or 5xx status"
    );

    describe_counter!(
        "cost_calculations_total",
        "Cost calculations by service and outcome"
    );
    describe_histogram!(
        "cost_calculation_duration_seconds",
        "Cost calculation duration in seconds"
    );
    describe_counter!("cost_batches_total", "Batch calculations");
    describe_histogram!("cost_batch_items", "Items per batch calculation");
    describe_counter!(
        "pricing_cache_lookups_total",
        "Pricing cache lookups by result (hit, miss, error)"
    );
    describe_counter!(
        "pricing_cache_writes_total",
        "Pricing cache repopulations by result"
    );
    describe_counter!(
        "pricing_store_lookups_total",
        "Durable pricing store lookups by service and result"
    );
}
