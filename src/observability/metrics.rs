//! Metrics collection and exposition.
//!
//! # Metrics
//! - `control_plane_reconcile_passes_total` (counter): completed passes
//! - `control_plane_reconcile_passes_skipped_total` (counter): passes
//!   skipped because the rule document failed to load
//! - `control_plane_reconcile_pass_duration_seconds` (histogram)
//! - `control_plane_nodes_published_total` / `_unchanged_total` /
//!   `_failed_total` (counters): per-node outcomes
//! - `control_plane_snapshots` (gauge): nodes with a published snapshot

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::reconcile::PassSummary;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one completed reconciliation pass.
pub fn record_pass(summary: &PassSummary, elapsed: Duration) {
    counter!("control_plane_reconcile_passes_total").increment(1);
    counter!("control_plane_nodes_published_total").increment(summary.published as u64);
    counter!("control_plane_nodes_unchanged_total").increment(summary.unchanged as u64);
    counter!("control_plane_nodes_failed_total").increment(summary.failed as u64);
    histogram!("control_plane_reconcile_pass_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a pass skipped because the rule document was unavailable.
pub fn record_pass_skipped() {
    counter!("control_plane_reconcile_passes_skipped_total").increment(1);
}

/// Record the number of nodes currently holding a snapshot.
pub fn record_store_size(size: usize) {
    gauge!("control_plane_snapshots").set(size as f64);
}
