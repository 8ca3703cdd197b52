//! Metrics collection.
//!
//! # Responsibilities
//! - Define worker metrics (polls, transmissions, grace periods)
//! - Record them through the `metrics` facade
//! - Install the Prometheus exporter when metrics are enabled
//!
//! # Metrics
//! - `worker_waitfile_polls_total` (counter): waitfile checks by status
//! - `worker_transmissions_total` (counter): uploads by outcome
//! - `worker_transmission_duration_seconds` (histogram): upload latency
//! - `worker_grace_period_started_total` (counter): shutdown requests honoured
//!
//! # Design Decisions
//! - Until [`install`] runs every record call is a no-op
//! - Labels are static strings only

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the global Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within the tokio runtime. Fails if a recorder is
/// already installed or the listener cannot bind.
pub fn install(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one look at the waitfile.
pub fn record_poll(status: &'static str) {
    metrics::counter!("worker_waitfile_polls_total", "status" => status).increment(1);
}

/// Record the outcome of an upload that started at `start_time`.
pub fn record_transmission(outcome: &'static str, start_time: Instant) {
    metrics::counter!("worker_transmissions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("worker_transmission_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record the start of a grace period.
pub fn record_grace_period_started() {
    metrics::counter!("worker_grace_period_started_total").increment(1);
}
