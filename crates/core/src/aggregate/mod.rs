//! Hourly aggregate updater.
//!
//! Recompute-and-replace: every run recomputes each hour's metrics from the
//! fact store and overwrites the stored row, so reruns and late-merged
//! orders can never double-count.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::warehouse::{AggregateStore, FactOrderLine, FactStore, HourlyMetric, WarehouseError};

/// Summary of a completed aggregate pass.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Hour rows written (inserted or overwritten).
    pub hours_updated: usize,
}

/// Recomputes per-hour metrics for a window.
pub struct AggregateUpdater;

impl AggregateUpdater {
    /// Recomputes the window's hourly metrics and upserts each hour.
    pub async fn run(
        facts: &dyn FactStore,
        aggregates: &dyn AggregateStore,
        window: NaiveDate,
    ) -> Result<AggregateReport, WarehouseError> {
        let lines = facts.lines_for_window(window)?;
        let metrics = compute_hourly_metrics(&lines, Utc::now());

        for metric in &metrics {
            aggregates.upsert(metric)?;
        }

        info!(window = %window, hours = metrics.len(), "hourly aggregates updated");

        Ok(AggregateReport {
            hours_updated: metrics.len(),
        })
    }
}

/// Computes per-hour metrics from fact rows.
///
/// Order and customer counts are distinct; revenue and average are over the
/// fact rows themselves, each of which carries its order's recorded total.
pub fn compute_hourly_metrics(
    lines: &[FactOrderLine],
    updated_at: DateTime<Utc>,
) -> Vec<HourlyMetric> {
    struct HourAccumulator<'a> {
        orders: HashSet<&'a str>,
        customers: HashSet<&'a str>,
        revenue_sum: f64,
        row_count: usize,
    }

    let mut hours: BTreeMap<DateTime<Utc>, HourAccumulator> = BTreeMap::new();

    for line in lines {
        let hour = truncate_to_hour(line.order_timestamp);
        let acc = hours.entry(hour).or_insert_with(|| HourAccumulator {
            orders: HashSet::new(),
            customers: HashSet::new(),
            revenue_sum: 0.0,
            row_count: 0,
        });
        acc.orders.insert(line.order_id.as_str());
        acc.customers.insert(line.customer_id.as_str());
        acc.revenue_sum += line.total_amount;
        acc.row_count += 1;
    }

    hours
        .into_iter()
        .map(|(metric_hour, acc)| HourlyMetric {
            metric_hour,
            total_orders: acc.orders.len() as i64,
            total_revenue: acc.revenue_sum,
            avg_order_value: acc.revenue_sum / acc.row_count as f64,
            unique_customers: acc.customers.len() as i64,
            updated_at,
        })
        .collect()
}

/// Truncates a timestamp to the start of its hour.
fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let truncated = secs - secs.rem_euclid(3600);
    DateTime::from_timestamp(truncated, 0).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Region;
    use crate::warehouse::SqliteWarehouse;
    use chrono::TimeZone;

    fn fact_line(order_id: &str, customer_id: &str, ts: &str, total: f64) -> FactOrderLine {
        let order_timestamp: DateTime<Utc> = ts.parse().unwrap();
        FactOrderLine {
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_tier: "bronze".to_string(),
            order_timestamp,
            order_date: order_timestamp.date_naive(),
            order_hour: 10,
            product_id: "PROD-1000".to_string(),
            product_name: None,
            category: None,
            quantity: 1,
            unit_price: total,
            line_total: total,
            total_amount: total,
            payment_status: None,
            city: None,
            state: None,
            country: None,
            region: Region::Other,
        }
    }

    #[test]
    fn test_truncate_to_hour() {
        let ts: DateTime<Utc> = "2024-01-01T10:42:31Z".parse().unwrap();
        assert_eq!(
            truncate_to_hour(ts),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_compute_groups_by_hour() {
        let lines = vec![
            fact_line("O1", "C1", "2024-01-01T10:05:00Z", 50.0),
            fact_line("O2", "C2", "2024-01-01T10:45:00Z", 40.0),
            fact_line("O3", "C1", "2024-01-01T11:10:00Z", 60.0),
        ];
        let metrics = compute_hourly_metrics(&lines, Utc::now());
        assert_eq!(metrics.len(), 2);

        assert_eq!(metrics[0].total_orders, 2);
        assert_eq!(metrics[0].total_revenue, 90.0);
        assert_eq!(metrics[0].avg_order_value, 45.0);
        assert_eq!(metrics[0].unique_customers, 2);

        assert_eq!(metrics[1].total_orders, 1);
        assert_eq!(metrics[1].unique_customers, 1);
    }

    #[test]
    fn test_distinct_counts_with_repeated_ids() {
        // Two line items of the same order, same customer
        let lines = vec![
            fact_line("O1", "C1", "2024-01-01T10:05:00Z", 50.0),
            fact_line("O1", "C1", "2024-01-01T10:05:00Z", 50.0),
        ];
        let metrics = compute_hourly_metrics(&lines, Utc::now());
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].total_orders, 1);
        assert_eq!(metrics[0].unique_customers, 1);
        // Revenue sums over fact rows; each line carries the order total.
        assert_eq!(metrics[0].total_revenue, 100.0);
    }

    #[test]
    fn test_empty_lines_yield_no_metrics() {
        assert!(compute_hourly_metrics(&[], Utc::now()).is_empty());
    }

    #[tokio::test]
    async fn test_rerun_overwrites_instead_of_accumulating() {
        let warehouse = SqliteWarehouse::in_memory().unwrap();
        let window: NaiveDate = "2024-01-01".parse().unwrap();
        let hour = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        warehouse
            .insert_lines(&[
                fact_line("O1", "C1", "2024-01-01T10:05:00Z", 50.0),
                fact_line("O2", "C2", "2024-01-01T10:15:00Z", 40.0),
                fact_line("O3", "C3", "2024-01-01T10:25:00Z", 60.0),
            ])
            .unwrap();

        AggregateUpdater::run(&warehouse, &warehouse, window)
            .await
            .unwrap();
        let first = warehouse.get(hour).unwrap().unwrap();
        assert_eq!(first.total_orders, 3);
        assert_eq!(first.total_revenue, 150.0);

        // A late order merges into an already-aggregated hour.
        warehouse
            .insert_lines(&[fact_line("O4", "C4", "2024-01-01T10:55:00Z", 60.0)])
            .unwrap();

        AggregateUpdater::run(&warehouse, &warehouse, window)
            .await
            .unwrap();
        let second = warehouse.get(hour).unwrap().unwrap();
        assert_eq!(second.total_orders, 4);
        // Overwritten with the fresh recomputation, not 150 + 210.
        assert_eq!(second.total_revenue, 210.0);
    }
}
