//! Metrics collection and exposition.
//!
//! # Metrics
//! - `video_api_requests_total` (counter): requests by method, status, version
//! - `video_api_request_duration_seconds` (histogram): latency distribution
//! - `video_api_videos` (gauge): stored videos per version

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a handled request.
pub fn record_request(method: &str, status: u16, version: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("version", version.to_string()),
    ];
    counter!("video_api_requests_total", &labels).increment(1);
    histogram!("video_api_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record how many videos a version currently stores.
pub fn record_video_count(version: &str, count: usize) {
    gauge!("video_api_videos", "version" => version.to_string()).set(count as f64);
}
