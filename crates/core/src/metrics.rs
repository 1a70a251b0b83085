//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline runs (counts by result, duration)
//! - Stage throughput (records staged, fact rows inserted)
//! - Quality findings
//! - Archival

use once_cell::sync::Lazy;
use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};

/// Pipeline runs total by result ("succeeded", "degraded", "failed").
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orderflow_runs_total", "Total pipeline runs"),
        &["result"],
    )
    .unwrap()
});

/// Pipeline run duration in seconds.
pub static RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "orderflow_run_duration_seconds",
            "Duration of pipeline runs",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 600.0]),
        &["result"],
    )
    .unwrap()
});

/// Records appended to staging.
pub static RECORDS_STAGED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_records_staged_total",
        "Total order records appended to staging",
    )
    .unwrap()
});

/// Quality findings recorded, by check type.
pub static FINDINGS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "orderflow_findings_total",
            "Total data-quality findings recorded",
        ),
        &["check_type"],
    )
    .unwrap()
});

/// Fact rows inserted.
pub static FACT_ROWS_INSERTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_fact_rows_inserted_total",
        "Total fact rows inserted",
    )
    .unwrap()
});

/// Input objects archived.
pub static OBJECTS_ARCHIVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_objects_archived_total",
        "Total input objects moved to the archive",
    )
    .unwrap()
});

/// Archive moves that failed and were left for the next run.
pub static ARCHIVE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "orderflow_archive_failures_total",
        "Total archive moves that failed",
    )
    .unwrap()
});

/// Registers every core metric with a registry.
pub fn register_core_metrics(registry: &Registry) {
    let _ = registry.register(Box::new(RUNS_TOTAL.clone()));
    let _ = registry.register(Box::new(RUN_DURATION.clone()));
    let _ = registry.register(Box::new(RECORDS_STAGED.clone()));
    let _ = registry.register(Box::new(FINDINGS_TOTAL.clone()));
    let _ = registry.register(Box::new(FACT_ROWS_INSERTED.clone()));
    let _ = registry.register(Box::new(OBJECTS_ARCHIVED.clone()));
    let _ = registry.register(Box::new(ARCHIVE_FAILURES.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_core_metrics() {
        let registry = Registry::new();
        register_core_metrics(&registry);

        RUNS_TOTAL.with_label_values(&["succeeded"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "orderflow_runs_total"));
    }
}
