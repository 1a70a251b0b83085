//! Pipeline lifecycle integration tests.
//!
//! These tests run the full state machine end to end over an in-memory
//! warehouse and a mock object store:
//! - duplicate staging fails the run before the fact store is touched
//! - amount mismatches annotate without blocking
//! - fact merge is idempotent across reruns
//! - hourly aggregates are recomputed, never accumulated
//! - archived inputs are never seen by a later run

use std::sync::Arc;

use chrono::NaiveDate;

use orderflow_core::{
    CheckType, FactMerger, FindingFilter, FindingStore, OrderPipeline, RunStatus, SensorConfig,
    Severity, SourceConfig, SqliteFindingStore, SqliteWarehouse, Stage,
};
use orderflow_core::testing::MockObjectStore;
use orderflow_core::warehouse::{AggregateStore, FactStore, StagingStore};
use orderflow_core::ObjectStore;

fn order_line(order_id: &str, ts: &str, items: &[(i64, f64)], total: f64) -> String {
    let items_json: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, (quantity, unit_price))| {
            format!(
                r#"{{"product_id":"PROD-{}","quantity":{},"unit_price":{}}}"#,
                1000 + i,
                quantity,
                unit_price
            )
        })
        .collect();
    format!(
        r#"{{"order_id":"{}","customer_id":"CUST-{}","order_timestamp":"{}","items":[{}],"total_amount":{},"payment_status":"completed"}}"#,
        order_id,
        order_id,
        ts,
        items_json.join(","),
        total
    )
}

fn window() -> NaiveDate {
    "2024-01-01".parse().unwrap()
}

struct Harness {
    store: MockObjectStore,
    warehouse: Arc<SqliteWarehouse>,
    findings: Arc<SqliteFindingStore>,
    pipeline: OrderPipeline,
}

fn harness() -> Harness {
    let store = MockObjectStore::new();
    let warehouse = Arc::new(SqliteWarehouse::in_memory().unwrap());
    let findings = Arc::new(SqliteFindingStore::in_memory().unwrap());
    let pipeline = OrderPipeline::new(
        Arc::new(store.clone()),
        warehouse.clone(),
        warehouse.clone(),
        warehouse.clone(),
        warehouse.clone(),
        findings.clone(),
        SourceConfig {
            root: "/tmp/unused".into(),
            landing_prefix: "landing/orders/".to_string(),
            archive_prefix: "archive/".to_string(),
            pattern: r"\.json$".to_string(),
        },
        SensorConfig {
            poke_interval_ms: 10,
            timeout_ms: 100,
        },
    )
    .unwrap();

    Harness {
        store,
        warehouse,
        findings,
        pipeline,
    }
}

/// Scenario A: a window containing a duplicated order fails at the quality
/// gate and leaves the fact store untouched.
#[tokio::test]
async fn duplicate_order_fails_run_before_fact_merge() {
    let h = harness();
    let o1 = order_line("O1", "2024-01-01T10:00:00Z", &[(2, 10.0), (1, 25.0)], 45.0);
    let o2 = order_line("O2", "2024-01-01T10:10:00Z", &[(1, 30.0)], 30.0);
    h.store
        .put(
            "landing/orders/batch.json",
            &format!("{}\n{}\n{}\n", o1, o2, o2),
        )
        .await;

    let report = h.pipeline.run(window()).await;
    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.failed_stage, Some(Stage::QualityGate));

    assert!(!h.warehouse.order_exists("O1").unwrap());
    assert!(!h.warehouse.order_exists("O2").unwrap());

    // The collision itself is on record.
    let duplicates = h
        .findings
        .query(&FindingFilter::new().with_check_type(CheckType::Duplicate))
        .unwrap();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].order_id, "O2");
    assert_eq!(duplicates[0].severity, Severity::Error);

    // The failed run's input was not archived.
    assert!(h.store.contains("landing/orders/batch.json").await);
}

/// Scenario B: an amount mismatch yields exactly one warning finding and the
/// order's line items still reach the fact store.
#[tokio::test]
async fn amount_mismatch_annotates_without_blocking() {
    let h = harness();
    let o3 = order_line("O3", "2024-01-01T10:00:00Z", &[(2, 10.0), (1, 25.0)], 50.0);
    h.store
        .put("landing/orders/batch.json", &format!("{}\n", o3))
        .await;

    let report = h.pipeline.run(window()).await;
    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.findings_recorded, 1);

    let mismatches = h
        .findings
        .query(&FindingFilter::new().with_check_type(CheckType::AmountMismatch))
        .unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].order_id, "O3");
    assert_eq!(mismatches[0].severity, Severity::Warning);

    // O3 was still merged: two line items, two fact rows.
    assert!(h.warehouse.order_exists("O3").unwrap());
    assert_eq!(h.warehouse.lines_for_window(window()).unwrap().len(), 2);
}

/// Scenario C: running the fact merge twice over identical staged data
/// inserts each order's line items exactly once.
#[tokio::test]
async fn rerun_of_fact_merge_inserts_nothing() {
    let h = harness();
    let o4 = order_line("O4", "2024-01-01T10:00:00Z", &[(2, 10.0), (1, 25.0)], 45.0);
    h.store
        .put("landing/orders/first.json", &format!("{}\n", o4))
        .await;

    let first = h.pipeline.run(window()).await;
    assert_eq!(first.status, RunStatus::Succeeded);
    assert_eq!(first.rows_inserted, 2);

    // Merge again over the unchanged window, as a retried run would.
    let remerge = FactMerger::run(
        h.warehouse.as_ref(),
        h.warehouse.as_ref(),
        h.warehouse.as_ref(),
        window(),
    )
    .await
    .unwrap();
    assert_eq!(remerge.orders_merged, 0);
    assert_eq!(remerge.orders_skipped, 1);
    assert_eq!(remerge.rows_inserted, 0);

    assert_eq!(h.warehouse.lines_for_window(window()).unwrap().len(), 2);
}

/// Scenario D: a later run recomputes an hour's metrics from the fact store
/// instead of accumulating onto the stored row.
#[tokio::test]
async fn aggregates_are_recomputed_not_accumulated() {
    let h = harness();
    let hour: chrono::DateTime<chrono::Utc> = "2024-01-01T10:00:00Z".parse().unwrap();

    let batch: String = [
        order_line("O1", "2024-01-01T10:05:00Z", &[(1, 50.0)], 50.0),
        order_line("O2", "2024-01-01T10:15:00Z", &[(1, 40.0)], 40.0),
        order_line("O3", "2024-01-01T10:25:00Z", &[(1, 60.0)], 60.0),
    ]
    .join("\n");
    h.store.put("landing/orders/first.json", &batch).await;

    let first = h.pipeline.run(window()).await;
    assert_eq!(first.status, RunStatus::Succeeded);

    let stored = h.warehouse.get(hour).unwrap().unwrap();
    assert_eq!(stored.total_orders, 3);
    assert_eq!(stored.total_revenue, 150.0);

    // One more order for the same, already-aggregated hour.
    h.store
        .put(
            "landing/orders/late.json",
            &order_line("O4", "2024-01-01T10:55:00Z", &[(1, 60.0)], 60.0),
        )
        .await;

    let second = h.pipeline.run(window()).await;
    assert_eq!(second.status, RunStatus::Succeeded);

    let stored = h.warehouse.get(hour).unwrap().unwrap();
    assert_eq!(stored.total_orders, 4);
    // 210, not 150 + 210.
    assert_eq!(stored.total_revenue, 210.0);
    assert_eq!(stored.unique_customers, 4);
}

/// Every load-set object is archived exactly once under one run stamp, and
/// an archived object is invisible to the next run's sensor.
#[tokio::test]
async fn archived_inputs_are_excluded_from_later_runs() {
    let h = harness();
    h.store
        .put(
            "landing/orders/a.json",
            &order_line("O1", "2024-01-01T10:00:00Z", &[(1, 10.0)], 10.0),
        )
        .await;
    h.store
        .put(
            "landing/orders/b.json",
            &order_line("O2", "2024-01-01T11:00:00Z", &[(1, 20.0)], 20.0),
        )
        .await;

    let report = h.pipeline.run(window()).await;
    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.objects_archived, 2);

    // Landing is empty; both objects live under a single run stamp.
    let renames = h.store.recorded_renames().await;
    assert_eq!(renames.len(), 2);
    let stamp_of = |to: &str| to.split('/').nth(1).map(String::from);
    assert_eq!(stamp_of(&renames[0].to), stamp_of(&renames[1].to));

    // The next run times out: nothing new landed, nothing is reprocessed.
    let next = h.pipeline.run(window()).await;
    assert_eq!(next.status, RunStatus::Failed);
    assert_eq!(next.failed_stage, Some(Stage::Sense));
    assert_eq!(h.warehouse.lines_for_window(window()).unwrap().len(), 2);
}

/// A partial archive failure degrades the run but keeps completed moves.
/// The unmoved object is re-loaded by the next run; its re-staged order
/// trips the duplicate gate, which fails closed before any double-count.
#[tokio::test]
async fn partial_archive_degrades_and_fails_closed_on_retry() {
    let h = harness();
    h.store
        .put(
            "landing/orders/a.json",
            &order_line("O1", "2024-01-01T10:00:00Z", &[(1, 10.0)], 10.0),
        )
        .await;
    h.store
        .put(
            "landing/orders/b.json",
            &order_line("O2", "2024-01-01T11:00:00Z", &[(1, 20.0)], 20.0),
        )
        .await;
    h.store.fail_rename_for("landing/orders/b.json").await;

    let degraded = h.pipeline.run(window()).await;
    assert_eq!(degraded.status, RunStatus::Degraded);
    assert_eq!(degraded.objects_archived, 1);
    assert_eq!(degraded.objects_unarchived, 1);
    // The degraded run merged everything; only archival was incomplete.
    assert_eq!(h.warehouse.lines_for_window(window()).unwrap().len(), 2);

    // The next run's load set is just the leftover object. Loading it
    // re-stages O2 into the same window, and the duplicate gate catches the
    // retried load before the fact store can double-count.
    h.store.clear_rename_failures().await;
    let retry = h.pipeline.run(window()).await;
    assert_eq!(retry.status, RunStatus::Failed);
    assert_eq!(retry.failed_stage, Some(Stage::QualityGate));
    assert_eq!(retry.objects_in_load_set, 1);

    // Fact store unchanged either way: no loss, no duplication.
    assert_eq!(h.warehouse.lines_for_window(window()).unwrap().len(), 2);
}

/// A malformed record anywhere in the load set stages nothing at all.
#[tokio::test]
async fn schema_violation_fails_run_with_empty_staging() {
    let h = harness();
    h.store
        .put(
            "landing/orders/good.json",
            &order_line("O1", "2024-01-01T10:00:00Z", &[(1, 10.0)], 10.0),
        )
        .await;
    h.store
        .put("landing/orders/bad.json", r#"{"order_id": "O2"}"#)
        .await;

    let report = h.pipeline.run(window()).await;
    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.failed_stage, Some(Stage::Load));
    assert!(h.warehouse.orders_for_window(window()).unwrap().is_empty());
    // Inputs stay in landing for the retry after the bad file is dealt with.
    assert_eq!(h.store.list("landing/orders/").await.unwrap().len(), 2);
}
