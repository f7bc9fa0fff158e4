//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_engine_recognize_total` (counter): recognize calls by `result`
//! - `route_engine_routes_drawn` (gauge): routes in the active set
//! - `route_engine_reloads_total` (counter): reloads by `result`
//!
//! # Design Decisions
//! - Thin wrappers over the `metrics` facade; no recorder, no cost

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Serve Prometheus metrics on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_recognize(matched: bool) {
    let result = if matched { "match" } else { "miss" };
    metrics::counter!("route_engine_recognize_total", "result" => result).increment(1);
}

pub fn record_routes_drawn(count: usize) {
    metrics::gauge!("route_engine_routes_drawn").set(count as f64);
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("route_engine_reloads_total", "result" => result).increment(1);
}
