//! Prometheus metrics for the store.
//!
//! The store records its metrics through the `metrics` facade, which is a
//! no-op until a recorder is installed. [`install_prometheus`] installs one
//! that serves the Prometheus text format over HTTP.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let addr = "0.0.0.0:9000".parse()?;
//! todosync_runtime::metrics::install_prometheus(addr)?;
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`MetricsError::Build`] if the histogram buckets are rejected and
/// [`MetricsError::Install`] if a recorder is already installed or the
/// listener cannot bind.
pub fn install_prometheus(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_store_metrics();
    tracing::info!(%addr, "Metrics exporter listening at http://{}/metrics", addr);
    Ok(())
}

/// Register descriptions for every metric the store records.
pub fn describe_store_metrics() {
    describe_counter!("store.commands.total", "Actions sent through the store");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time spent applying one action"
    );
    describe_counter!("store.effects.executed", "Effects started, by type");
    describe_counter!("store.shutdown.initiated", "Graceful shutdowns started");
    describe_counter!(
        "store.shutdown.timeout",
        "Shutdowns that gave up with effects still running"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );
}
