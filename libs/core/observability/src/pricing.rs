//! Cost calculation metrics.

use metrics::{counter, histogram};
use std::time::Instant;

/// Recorder for the calculation core
pub struct PricingMetrics;

impl PricingMetrics {
    // =========================================================================
    // Calculations
    // =========================================================================

    /// Record one finished calculation; `outcome` is `success` or an error code
    pub fn record_calculation(service_code: &str, outcome: &str, duration_secs: f64) {
        counter!(
            "cost_calculations_total",
            "service" => service_code.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);
        histogram!(
            "cost_calculation_duration_seconds",
            "service" => service_code.to_string()
        )
        .record(duration_secs);
    }

    pub fn record_batch(items: usize, failed: usize, duration_secs: f64) {
        counter!("cost_batches_total").increment(1);
        histogram!("cost_batch_items").record(items as f64);

        tracing::debug!(
            items = items,
            failed = failed,
            duration_secs = duration_secs,
            "Batch calculation finished"
        );
    }

    // =========================================================================
    // Pricing data lookups
    // =========================================================================

    pub fn record_cache_hit() {
        counter!("pricing_cache_lookups_total", "result" => "hit").increment(1);
    }

    pub fn record_cache_miss() {
        counter!("pricing_cache_lookups_total", "result" => "miss").increment(1);
    }

    pub fn record_cache_error() {
        counter!("pricing_cache_lookups_total", "result" => "error").increment(1);
    }

    pub fn record_cache_write(success: bool) {
        let result = if success { "ok" } else { "error" };
        counter!("pricing_cache_writes_total", "result" => result).increment(1);
    }

    pub fn record_store_lookup(service_code: &str, found: bool) {
        let result = if found { "found" } else { "not_found" };
        counter!(
            "pricing_store_lookups_total",
            "service" => service_code.to_string(),
            "result" => result
        )
        .increment(1);
    }
}

/// Measures one calculation.
///
/// Call [`CalculationTimer::finish`] with the outcome; a timer dropped without
/// finishing is recorded as `cancelled`.
pub struct CalculationTimer {
    start: Instant,
    service_code: String,
    finished: bool,
}

impl CalculationTimer {
    pub fn start(service_code: &str) -> Self {
        Self {
            start: Instant::now(),
            service_code: service_code.to_string(),
            finished: false,
        }
    }

    /// Record the outcome and return the elapsed seconds
    pub fn finish(mut self, outcome: &str) -> f64 {
        self.record(outcome)
    }

    fn record(&mut self, outcome: &str) -> f64 {
        self.finished = true;
        let elapsed = self.start.elapsed().as_secs_f64();
        PricingMetrics::record_calculation(&self.service_code, outcome, elapsed);
        elapsed
    }
}

impl Drop for CalculationTimer {
    fn drop(&mut self) {
        if !self.finished {
            self.record("cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn render<F: FnOnce()>(f: F) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn test_timer_records_outcome() {
        let output = render(|| {
            let timer = CalculationTimer::start("AmazonEC2");
            assert!(timer.finish("success") >= 0.0);
        });
        assert!(output.contains("cost_calculations_total"));
        assert!(output.contains(r#"outcome="success""#));
        assert!(output.contains(r#"service="AmazonEC2""#));
    }

    #[test]
    fn test_dropped_timer_records_cancelled() {
        let output = render(|| {
            let _timer = CalculationTimer::start("AWSLambda");
        });
        assert!(output.contains(r#"outcome="cancelled""#));
    }

    #[test]
    fn test_cache_lookups_by_result() {
        let output = render(|| {
            PricingMetrics::record_cache_hit();
            PricingMetrics::record_cache_miss();
            PricingMetrics::record_cache_error();
        });
        for result in ["hit", "miss", "error"] {
            assert!(output.contains(&format!(r#"result="{}""#, result)));
        }
    }
}
