// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the zonelink synchronizer.
//!
//! All metrics use the namespace prefix `zonelink_firestoned_io`
//! (prometheus-safe version of "zonelink.firestoned.io") and are exposed on
//! the health server's `/metrics` endpoint.

use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all zonelink metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "zonelink_firestoned_io";

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via the
/// `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliation passes by status
///
/// Labels:
/// - `status`: Outcome (`success`, `degraded`, `error`)
pub static PASSES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconcile_passes_total"),
        "Total number of reconciliation passes by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliation passes in seconds
pub static PASS_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconcile_pass_duration_seconds"),
        "Duration of reconciliation passes in seconds",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["provider"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Record Change Metrics
// ============================================================================

/// Total number of applied record changes by action
///
/// Labels:
/// - `action`: `create`, `update`, or `delete`
pub static RECORD_CHANGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_changes_total"),
        "Total number of applied record changes by action",
    );
    let counter = CounterVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of record operations rejected by the provider
pub static RECORD_FAILURES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_failures_total"),
        "Total number of record operations rejected by the provider",
    );
    let counter = CounterVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of scheme resolutions skipped per pass
///
/// Labels:
/// - `scheme`: `internal` or `internet-facing`
pub static SKIPPED_SCHEMES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_skipped_schemes_total"),
        "Total number of passes that skipped a scheme due to resolution failure",
    );
    let counter = CounterVec::new(opts, &["scheme"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Number of hostnames in the current desired set
pub static DESIRED_HOSTNAMES: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_desired_hostnames"),
        "Number of hostnames in the current desired set",
    );
    let gauge = GaugeVec::new(opts, &["provider"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record the outcome of a reconciliation pass.
///
/// # Arguments
/// * `provider` - Active provider name (`aws`, `gcp`, `static`)
/// * `status` - Pass status (`success`, `degraded`, `error`)
/// * `duration` - Pass duration
pub fn record_pass(provider: &str, status: &str, duration: Duration) {
    PASSES_TOTAL.with_label_values(&[status]).inc();
    PASS_DURATION_SECONDS
        .with_label_values(&[provider])
        .observe(duration.as_secs_f64());
}

/// Record applied record change counts for one pass.
#[allow(clippy::cast_precision_loss)]
pub fn record_changes(created: usize, updated: usize, deleted: usize) {
    RECORD_CHANGES_TOTAL
        .with_label_values(&["create"])
        .inc_by(created as f64);
    RECORD_CHANGES_TOTAL
        .with_label_values(&["update"])
        .inc_by(updated as f64);
    RECORD_CHANGES_TOTAL
        .with_label_values(&["delete"])
        .inc_by(deleted as f64);
}

/// Record one rejected record operation.
pub fn record_failure(action: &str) {
    RECORD_FAILURES_TOTAL.with_label_values(&[action]).inc();
}

/// Record one skipped scheme.
pub fn record_skipped_scheme(scheme: &str) {
    SKIPPED_SCHEMES_TOTAL.with_label_values(&[scheme]).inc();
}

/// Record the size of the desired set for one pass.
#[allow(clippy::cast_precision_loss)]
pub fn record_desired_hostnames(provider: &str, count: usize) {
    DESIRED_HOSTNAMES
        .with_label_values(&[provider])
        .set(count as f64);
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
