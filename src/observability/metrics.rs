//! Metrics collection and exposition.
//!
//! # Metrics
//! - `search_proxy_requests_total` (counter): requests by category, status
//! - `search_proxy_request_duration_seconds` (histogram): latency by category
//! - `search_proxy_upstream_errors_total` (counter): upstream failures by category, kind
//! - `search_proxy_chunks_emitted_total` (counter): paginated chunks written
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::upstream::SearchCategory;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(category: SearchCategory, status: u16, start: Instant) {
    metrics::counter!(
        "search_proxy_requests_total",
        "category" => category.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "search_proxy_request_duration_seconds",
        "category" => category.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(category: SearchCategory, kind: &'static str) {
    metrics::counter!(
        "search_proxy_upstream_errors_total",
        "category" => category.as_str(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_chunk() {
    metrics::counter!("search_proxy_chunks_emitted_total").increment(1);
}
