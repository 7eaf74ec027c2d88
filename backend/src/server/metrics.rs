//! Prometheus request metrics exposed at `/metrics`.

use std::io;

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

const NAMESPACE: &str = "visa";

/// Build the request-metrics middleware.
///
/// # Errors
/// Returns [`io::Error`] when the collectors cannot be registered.
pub(crate) fn build_metrics() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint("/metrics")
        .build()
        .map_err(|err| io::Error::other(format!("metrics registration failed: {err}")))
}
