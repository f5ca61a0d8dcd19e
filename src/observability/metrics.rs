//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devserver_requests_total` (counter): requests by service, route, status
//! - `devserver_request_duration_seconds` (histogram): latency by service,
//!   exported with [`LATENCY_BUCKETS`]
//! - `devserver_namespaces_enabled` (gauge): namespaces the server was built with
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is only installed when a metrics port is set,
//!   so values recorded before [`install_exporter`] are lost

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

const REQUEST_DURATION: &str = "devserver_request_duration_seconds";

/// Histogram buckets for request latency, in seconds.
pub const LATENCY_BUCKETS: [f64; 10] = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0];

/// Install the global Prometheus recorder with an HTTP scrape listener.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), &LATENCY_BUCKETS)?
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(service: &'static str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "devserver_requests_total",
        "service" => service,
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(REQUEST_DURATION, "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record the number of enabled namespaces.
pub fn record_namespaces(count: usize) {
    ::metrics::gauge!("devserver_namespaces_enabled").set(count as f64);
}
