//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Indexer searches (outcome, duration)
//! - Result registrations
//! - Uploads to the download client
//! - Chat commands handled by the dispatcher

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Indexer Metrics
// =============================================================================

/// Searches total by result ("success", "timeout", "unreachable", ...).
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magpie_searches_total", "Total indexer searches"),
        &["result"],
    )
    .unwrap()
});

/// Search duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "magpie_search_duration_seconds",
            "Duration of indexer searches",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Registry Metrics
// =============================================================================

/// Registrations by result ("registered", "codes_exhausted").
pub static REGISTRATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magpie_registrations_total",
            "Total result set registrations",
        ),
        &["result"],
    )
    .unwrap()
});

/// Users currently holding a result set.
pub static REGISTRY_USERS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "magpie_registry_users",
        "Number of users with a live result set",
    )
    .unwrap()
});

// =============================================================================
// Upload Metrics
// =============================================================================

/// Uploads by kind ("magnet", "torrent_file") and result.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magpie_uploads_total", "Total uploads to the download client"),
        &["kind", "result"],
    )
    .unwrap()
});

// =============================================================================
// Dispatcher Metrics
// =============================================================================

/// Commands handled by name and outcome ("ok", "unauthorized").
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magpie_commands_total", "Total chat commands handled"),
        &["command", "outcome"],
    )
    .unwrap()
});

/// All core metrics, for registration with the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(REGISTRATIONS_TOTAL.clone()),
        Box::new(REGISTRY_USERS.clone()),
        Box::new(UPLOADS_TOTAL.clone()),
        Box::new(COMMANDS_TOTAL.clone()),
    ]
}
