//! Trait definitions for the warehouse stores.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::Order;

use super::error::WarehouseError;
use super::types::{CustomerRecord, FactOrderLine, HourlyMetric, ProductRecord};

/// Append-only staging table for raw orders.
///
/// Appends are at-least-once: retried loads may stage the same order twice
/// within a window. Staged rows are never mutated or deleted by the pipeline.
pub trait StagingStore: Send + Sync {
    /// Appends records, returning how many were written.
    fn append(&self, orders: &[Order]) -> Result<usize, WarehouseError>;

    /// All staged rows whose order date falls in the window, duplicates
    /// included.
    fn orders_for_window(&self, window: NaiveDate) -> Result<Vec<Order>, WarehouseError>;
}

/// The durable fact store. Grows by append-if-new only.
pub trait FactStore: Send + Sync {
    /// Whether any fact row exists for this order id.
    fn order_exists(&self, order_id: &str) -> Result<bool, WarehouseError>;

    /// Inserts fact rows, returning how many were written.
    ///
    /// Callers are responsible for the existence check; this is a plain
    /// insert.
    fn insert_lines(&self, lines: &[FactOrderLine]) -> Result<usize, WarehouseError>;

    /// All fact rows whose order date falls in the window.
    fn lines_for_window(&self, window: NaiveDate) -> Result<Vec<FactOrderLine>, WarehouseError>;
}

/// The hourly aggregate store. Rows are replaced wholesale by key.
pub trait AggregateStore: Send + Sync {
    /// Inserts or fully overwrites the metric row for its hour.
    fn upsert(&self, metric: &HourlyMetric) -> Result<(), WarehouseError>;

    /// The metric row for an hour, if one exists.
    fn get(&self, metric_hour: DateTime<Utc>) -> Result<Option<HourlyMetric>, WarehouseError>;

    /// All metric rows, oldest hour first.
    fn all(&self) -> Result<Vec<HourlyMetric>, WarehouseError>;
}

/// Read-only dimension lookups, plus upserts for seeding.
///
/// A missed lookup is not an error; fact merge applies left-join defaults.
pub trait DimensionStore: Send + Sync {
    /// The customer's tier, if the customer is known.
    fn customer_tier(&self, customer_id: &str) -> Result<Option<String>, WarehouseError>;

    /// The product row, if the product is known.
    fn product(&self, product_id: &str) -> Result<Option<ProductRecord>, WarehouseError>;

    /// Inserts or replaces a customer dimension row.
    fn upsert_customer(&self, customer: &CustomerRecord) -> Result<(), WarehouseError>;

    /// Inserts or replaces a product dimension row.
    fn upsert_product(&self, product: &ProductRecord) -> Result<(), WarehouseError>;
}
