//! Types for the warehouse module.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Region;

/// One denormalized fact row per (order, line item) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactOrderLine {
    pub order_id: String,
    pub customer_id: String,
    /// Customer tier from dim_customers; "bronze" when the lookup missed.
    pub customer_tier: String,
    pub order_timestamp: DateTime<Utc>,
    pub order_date: NaiveDate,
    /// Hour-of-day component of the order timestamp (0-23).
    pub order_hour: u32,
    pub product_id: String,
    /// Product name from dim_products; unset when the lookup missed.
    pub product_name: Option<String>,
    /// Product category from dim_products; unset when the lookup missed.
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    /// quantity * unit_price for this line.
    pub line_total: f64,
    /// The order-level recorded total, repeated on every line.
    pub total_amount: f64,
    pub payment_status: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub region: Region,
}

/// Rolling per-hour aggregate, keyed by the hour-truncated timestamp.
///
/// Every field is overwritten on recompute; nothing is ever incremented in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyMetric {
    pub metric_hour: DateTime<Utc>,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub unique_customers: i64,
    pub updated_at: DateTime<Utc>,
}

/// A customer dimension row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub registration_date: NaiveDate,
    pub customer_tier: String,
}

/// A product dimension row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub stock_level: i64,
}
