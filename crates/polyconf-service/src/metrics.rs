//! Prometheus metrics for the resolution engine.
//!
//! This module provides:
//! - Cache metrics (hit/miss/error rates)
//! - Resolution metrics (outcome by source, fallback count)

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names as constants for consistency.
pub mod names {
    // Cache metrics
    pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
    pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
    pub const CACHE_ERRORS_TOTAL: &str = "cache_errors_total";

    // Resolution metrics
    pub const RESOLUTIONS_TOTAL: &str = "resolutions_total";
    pub const LANGUAGE_FALLBACKS_TOTAL: &str = "language_fallbacks_total";
}

/// Initialize the Prometheus metrics exporter.
///
/// This should be called once at startup.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    // Use install_recorder() for pull-based metrics (callers serve the
    // rendered text themselves)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }

            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Render all metrics in Prometheus text format.
///
/// Returns `None` if metrics were not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

/// Record a cache hit.
pub fn record_cache_hit(mode: &str) {
    counter!(names::CACHE_HITS_TOTAL, "mode" => mode.to_string()).increment(1);
}

/// Record a cache miss.
pub fn record_cache_miss() {
    counter!(names::CACHE_MISSES_TOTAL).increment(1);
}

/// Record a swallowed cache failure.
pub fn record_cache_error(operation: &str) {
    counter!(names::CACHE_ERRORS_TOTAL, "operation" => operation.to_string()).increment(1);
}

/// Record a completed resolution and where its value came from.
pub fn record_resolution(source: &str) {
    counter!(names::RESOLUTIONS_TOTAL, "source" => source.to_string()).increment(1);
}

/// Record a translation served through the default-language fallback.
pub fn record_language_fallback() {
    counter!(names::LANGUAGE_FALLBACKS_TOTAL).increment(1);
}
