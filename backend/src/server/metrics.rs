//! Prometheus request metrics exposed on `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

const NAMESPACE: &str = "network";
const ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware.
///
/// # Errors
/// Returns [`std::io::Error`] when the collectors cannot be registered.
pub fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}
