//! Prometheus metrics for imagegen-service.
//!
//! Recording helpers are no-ops until [`init_metrics`] has run.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static IMAGE_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static INFERENCE_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static INFERENCE_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() {
    let registry = Registry::new();

    // Requests by resolved model and response status
    let image_requests = IntCounterVec::new(
        Opts::new("image_requests_total", "Total image generation requests"),
        &["model", "status"],
    )
    .expect("Failed to create image_requests_total metric");

    let inference_latency = HistogramVec::new(
        HistogramOpts::new(
            "inference_latency_seconds",
            "Inference call latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
    )
    .expect("Failed to create inference_latency_seconds metric");

    let inference_errors = IntCounterVec::new(
        Opts::new("inference_errors_total", "Total inference errors"),
        &["model", "error_type"],
    )
    .expect("Failed to create inference_errors_total metric");

    registry
        .register(Box::new(image_requests.clone()))
        .expect("Failed to register image_requests_total");
    registry
        .register(Box::new(inference_latency.clone()))
        .expect("Failed to register inference_latency_seconds");
    registry
        .register(Box::new(inference_errors.clone()))
        .expect("Failed to register inference_errors_total");

    let _ = REGISTRY.set(registry);
    let _ = IMAGE_REQUESTS_TOTAL.set(image_requests);
    let _ = INFERENCE_LATENCY_SECONDS.set(inference_latency);
    let _ = INFERENCE_ERRORS_TOTAL.set(inference_errors);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a finished image request. `model` is `"invalid"` when the request
/// never resolved to a model.
pub fn record_image_request(model: &str, status: u16) {
    if let Some(counter) = IMAGE_REQUESTS_TOTAL.get() {
        let status = status.to_string();
        counter.with_label_values(&[model, status.as_str()]).inc();
    }
}

pub fn record_inference_latency(model: &str, duration_secs: f64) {
    if let Some(histogram) = INFERENCE_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[model]).observe(duration_secs);
    }
}

pub fn record_inference_error(model: &str, error_type: &str) {
    if let Some(counter) = INFERENCE_ERRORS_TOTAL.get() {
        counter.with_label_values(&[model, error_type]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_recorded_requests() {
        init_metrics();
        record_image_request("speed", 200);
        record_inference_latency("speed", 0.42);

        let text = get_metrics();
        assert!(text.contains("image_requests_total"));
        assert!(text.contains("inference_latency_seconds"));
    }
}
