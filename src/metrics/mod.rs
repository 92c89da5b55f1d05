//! Prometheus metrics for symdex
//!
//! Index size, per-file throughput and watch-mode activity.

use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Once;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Index metrics
    // ============================================================================

    /// Symbols currently in the index
    pub static ref SYMBOLS: Gauge = Gauge::with_opts(
        Opts::new(
            "symdex_symbols_total",
            "Symbols currently in the index"
        )
    ).expect("Failed to create SYMBOLS gauge");

    /// Files successfully extracted
    pub static ref FILES_INDEXED: Counter = Counter::with_opts(
        Opts::new(
            "symdex_files_indexed_total",
            "Files successfully extracted"
        )
    ).expect("Failed to create FILES_INDEXED counter");

    /// Files skipped because of a read or store failure
    pub static ref FILE_ERRORS: Counter = Counter::with_opts(
        Opts::new(
            "symdex_file_errors_total",
            "Files skipped because of a read or store failure"
        )
    ).expect("Failed to create FILE_ERRORS counter");

    /// Scan duration in seconds
    pub static ref SCAN_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "symdex_scan_duration_seconds",
            "Scan duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0])
    ).expect("Failed to create SCAN_DURATION histogram");

    // ============================================================================
    // Watch mode metrics
    // ============================================================================

    /// Deleted files removed from the index
    pub static ref FILES_DELETED: Counter = Counter::with_opts(
        Opts::new(
            "symdex_files_deleted_total",
            "Deleted files removed from the index"
        )
    ).expect("Failed to create FILES_DELETED counter");

    /// Debounced batches flushed for re-indexing
    pub static ref INCREMENTAL_FLUSHES: Counter = Counter::with_opts(
        Opts::new(
            "symdex_incremental_flushes_total",
            "Debounced batches flushed for re-indexing"
        )
    ).expect("Failed to create INCREMENTAL_FLUSHES counter");

    /// Number of files per flushed batch
    pub static ref FLUSHED_FILES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "symdex_flushed_files_count",
            "Number of files per flushed batch"
        ).buckets(vec![1.0, 5.0, 10.0, 50.0, 100.0, 500.0])
    ).expect("Failed to create FLUSHED_FILES histogram");
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; only the first call registers.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(SYMBOLS.clone()))
            .expect("Failed to register SYMBOLS");
        REGISTRY
            .register(Box::new(FILES_INDEXED.clone()))
            .expect("Failed to register FILES_INDEXED");
        REGISTRY
            .register(Box::new(FILE_ERRORS.clone()))
            .expect("Failed to register FILE_ERRORS");
        REGISTRY
            .register(Box::new(SCAN_DURATION.clone()))
            .expect("Failed to register SCAN_DURATION");
        REGISTRY
            .register(Box::new(FILES_DELETED.clone()))
            .expect("Failed to register FILES_DELETED");
        REGISTRY
            .register(Box::new(INCREMENTAL_FLUSHES.clone()))
            .expect("Failed to register INCREMENTAL_FLUSHES");
        REGISTRY
            .register(Box::new(FLUSHED_FILES.clone()))
            .expect("Failed to register FLUSHED_FILES");
    });
}

/// Gather all metrics and encode them in Prometheus text format
///
/// Returns an empty string if encoding fails.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Metrics contained invalid UTF-8: {}", e);
        String::new()
    })
}

/// Current metric values for the CLI stats command
pub struct MetricSnapshot {
    pub symbols: f64,
    pub files_indexed_total: f64,
    pub file_errors_total: f64,
    pub scan_duration_avg: f64,
}

impl MetricSnapshot {
    pub fn capture() -> Self {
        Self {
            symbols: SYMBOLS.get(),
            files_indexed_total: FILES_INDEXED.get(),
            file_errors_total: FILE_ERRORS.get(),
            scan_duration_avg: calculate_histogram_avg(&SCAN_DURATION),
        }
    }
}

fn calculate_histogram_avg(histogram: &Histogram) -> f64 {
    let count = histogram.get_sample_count();
    if count == 0 {
        return 0.0;
    }
    histogram.get_sample_sum() / count as f64
}
