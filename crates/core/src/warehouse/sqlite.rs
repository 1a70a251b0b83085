//! SQLite-backed warehouse implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::model::{Order, Region};

use super::error::WarehouseError;
use super::traits::{AggregateStore, DimensionStore, FactStore, StagingStore};
use super::types::{CustomerRecord, FactOrderLine, HourlyMetric, ProductRecord};

/// One SQLite database serving all four warehouse stores.
pub struct SqliteWarehouse {
    conn: Mutex<Connection>,
}

impl SqliteWarehouse {
    /// Create a warehouse, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, WarehouseError> {
        let conn = Connection::open(path).map_err(|e| WarehouseError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory warehouse (useful for testing).
    pub fn in_memory() -> Result<Self, WarehouseError> {
        let conn =
            Connection::open_in_memory().map_err(|e| WarehouseError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), WarehouseError> {
        conn.execute_batch(
            r#"
            -- Raw staged orders, append-only within a window
            CREATE TABLE IF NOT EXISTS staging_orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id TEXT NOT NULL,
                customer_id TEXT NOT NULL,
                order_timestamp TEXT NOT NULL,
                order_date TEXT NOT NULL,
                items TEXT NOT NULL,
                total_amount REAL NOT NULL,
                payment_status TEXT,
                shipping_address TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_staging_orders_date ON staging_orders(order_date);
            CREATE INDEX IF NOT EXISTS idx_staging_orders_order_id ON staging_orders(order_id);

            -- Denormalized facts, one row per (order, line item)
            CREATE TABLE IF NOT EXISTS fact_orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id TEXT NOT NULL,
                customer_id TEXT NOT NULL,
                customer_tier TEXT NOT NULL,
                order_timestamp TEXT NOT NULL,
                order_date TEXT NOT NULL,
                order_hour INTEGER NOT NULL,
                product_id TEXT NOT NULL,
                product_name TEXT,
                category TEXT,
                quantity INTEGER NOT NULL,
                unit_price REAL NOT NULL,
                line_total REAL NOT NULL,
                total_amount REAL NOT NULL,
                payment_status TEXT,
                city TEXT,
                state TEXT,
                country TEXT,
                region TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_fact_orders_order_id ON fact_orders(order_id);
            CREATE INDEX IF NOT EXISTS idx_fact_orders_date ON fact_orders(order_date);

            -- Hourly rollups, one row per hour, overwritten on recompute
            CREATE TABLE IF NOT EXISTS agg_hourly_metrics (
                metric_hour TEXT PRIMARY KEY,
                total_orders INTEGER NOT NULL,
                total_revenue REAL NOT NULL,
                avg_order_value REAL NOT NULL,
                unique_customers INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Dimensions, read-only to the pipeline
            CREATE TABLE IF NOT EXISTS dim_customers (
                customer_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                registration_date TEXT NOT NULL,
                customer_tier TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS dim_products (
                product_id TEXT PRIMARY KEY,
                product_name TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL,
                stock_level INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| WarehouseError::Database(e.to_string()))?;

        Ok(())
    }

    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_fact_line(row: &Row) -> rusqlite::Result<FactOrderLine> {
        let timestamp_str: String = row.get(3)?;
        let date_str: String = row.get(4)?;
        let region_str: String = row.get(17)?;

        Ok(FactOrderLine {
            order_id: row.get(0)?,
            customer_id: row.get(1)?,
            customer_tier: row.get(2)?,
            order_timestamp: Self::parse_timestamp(&timestamp_str),
            order_date: date_str.parse().unwrap_or_default(),
            order_hour: row.get(5)?,
            product_id: row.get(6)?,
            product_name: row.get(7)?,
            category: row.get(8)?,
            quantity: row.get(9)?,
            unit_price: row.get(10)?,
            line_total: row.get(11)?,
            total_amount: row.get(12)?,
            payment_status: row.get(13)?,
            city: row.get(14)?,
            state: row.get(15)?,
            country: row.get(16)?,
            region: region_str.parse().unwrap_or(Region::Other),
        })
    }
}

impl StagingStore for SqliteWarehouse {
    fn append(&self, orders: &[Order]) -> Result<usize, WarehouseError> {
        let conn = self.conn.lock().unwrap();

        let mut written = 0;
        for order in orders {
            let items = serde_json::to_string(&order.items)
                .map_err(|e| WarehouseError::Serialization(e.to_string()))?;
            let address = order
                .shipping_address
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| WarehouseError::Serialization(e.to_string()))?;

            conn.execute(
                "INSERT INTO staging_orders
                 (order_id, customer_id, order_timestamp, order_date, items,
                  total_amount, payment_status, shipping_address)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    order.order_id,
                    order.customer_id,
                    order.order_timestamp.to_rfc3339(),
                    order.order_timestamp.date_naive().to_string(),
                    items,
                    order.total_amount,
                    order.payment_status,
                    address,
                ],
            )
            .map_err(|e| WarehouseError::Database(e.to_string()))?;
            written += 1;
        }

        Ok(written)
    }

    fn orders_for_window(&self, window: NaiveDate) -> Result<Vec<Order>, WarehouseError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT order_id, customer_id, order_timestamp, items,
                        total_amount, payment_status, shipping_address
                 FROM staging_orders WHERE order_date = ? ORDER BY id",
            )
            .map_err(|e| WarehouseError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![window.to_string()], |row| {
                let timestamp_str: String = row.get(2)?;
                let items_json: String = row.get(3)?;
                let address_json: Option<String> = row.get(6)?;
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    timestamp_str,
                    items_json,
                    row.get::<_, f64>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    address_json,
                ))
            })
            .map_err(|e| WarehouseError::Database(e.to_string()))?;

        let mut orders = Vec::new();
        for row in rows {
            let (order_id, customer_id, timestamp_str, items_json, total_amount, payment_status, address_json) =
                row.map_err(|e| WarehouseError::Database(e.to_string()))?;

            let items = serde_json::from_str(&items_json)
                .map_err(|e| WarehouseError::Serialization(e.to_string()))?;
            let shipping_address = address_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| WarehouseError::Serialization(e.to_string()))?;

            orders.push(Order {
                order_id,
                customer_id,
                order_timestamp: Self::parse_timestamp(&timestamp_str),
                items,
                total_amount,
                payment_status,
                shipping_address,
            });
        }
        Ok(orders)
    }
}

impl FactStore for SqliteWarehouse {
    fn order_exists(&self, order_id: &str) -> Result<bool, WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT 1 FROM fact_orders WHERE order_id = ? LIMIT 1",
            params![order_id],
            |_| Ok(true),
        )
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(false),
            other => Err(WarehouseError::Database(other.to_string())),
        })
    }

    fn insert_lines(&self, lines: &[FactOrderLine]) -> Result<usize, WarehouseError> {
        let conn = self.conn.lock().unwrap();

        let mut written = 0;
        for line in lines {
            conn.execute(
                "INSERT INTO fact_orders
                 (order_id, customer_id, customer_tier, order_timestamp, order_date,
                  order_hour, product_id, product_name, category, quantity, unit_price,
                  line_total, total_amount, payment_status, city, state, country, region)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    line.order_id,
                    line.customer_id,
                    line.customer_tier,
                    line.order_timestamp.to_rfc3339(),
                    line.order_date.to_string(),
                    line.order_hour,
                    line.product_id,
                    line.product_name,
                    line.category,
                    line.quantity,
                    line.unit_price,
                    line.line_total,
                    line.total_amount,
                    line.payment_status,
                    line.city,
                    line.state,
                    line.country,
                    line.region.as_str(),
                ],
            )
            .map_err(|e| WarehouseError::Database(e.to_string()))?;
            written += 1;
        }
        Ok(written)
    }

    fn lines_for_window(&self, window: NaiveDate) -> Result<Vec<FactOrderLine>, WarehouseError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT order_id, customer_id, customer_tier, order_timestamp, order_date,
                        order_hour, product_id, product_name, category, quantity, unit_price,
                        line_total, total_amount, payment_status, city, state, country, region
                 FROM fact_orders WHERE order_date = ? ORDER BY id",
            )
            .map_err(|e| WarehouseError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![window.to_string()], Self::row_to_fact_line)
            .map_err(|e| WarehouseError::Database(e.to_string()))?;

        let mut lines = Vec::new();
        for row in rows {
            lines.push(row.map_err(|e| WarehouseError::Database(e.to_string()))?);
        }
        Ok(lines)
    }
}

impl AggregateStore for SqliteWarehouse {
    fn upsert(&self, metric: &HourlyMetric) -> Result<(), WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO agg_hourly_metrics
             (metric_hour, total_orders, total_revenue, avg_order_value, unique_customers, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(metric_hour) DO UPDATE SET
                total_orders = excluded.total_orders,
                total_revenue = excluded.total_revenue,
                avg_order_value = excluded.avg_order_value,
                unique_customers = excluded.unique_customers,
                updated_at = excluded.updated_at",
            params![
                metric.metric_hour.to_rfc3339(),
                metric.total_orders,
                metric.total_revenue,
                metric.avg_order_value,
                metric.unique_customers,
                metric.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| WarehouseError::Database(e.to_string()))?;
        Ok(())
    }

    fn get(&self, metric_hour: DateTime<Utc>) -> Result<Option<HourlyMetric>, WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT metric_hour, total_orders, total_revenue, avg_order_value,
                    unique_customers, updated_at
             FROM agg_hourly_metrics WHERE metric_hour = ?",
            params![metric_hour.to_rfc3339()],
            |row| {
                let hour_str: String = row.get(0)?;
                let updated_str: String = row.get(5)?;
                Ok(HourlyMetric {
                    metric_hour: Self::parse_timestamp(&hour_str),
                    total_orders: row.get(1)?,
                    total_revenue: row.get(2)?,
                    avg_order_value: row.get(3)?,
                    unique_customers: row.get(4)?,
                    updated_at: Self::parse_timestamp(&updated_str),
                })
            },
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(WarehouseError::Database(other.to_string())),
        })
    }

    fn all(&self) -> Result<Vec<HourlyMetric>, WarehouseError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT metric_hour, total_orders, total_revenue, avg_order_value,
                        unique_customers, updated_at
                 FROM agg_hourly_metrics ORDER BY metric_hour",
            )
            .map_err(|e| WarehouseError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let hour_str: String = row.get(0)?;
                let updated_str: String = row.get(5)?;
                Ok(HourlyMetric {
                    metric_hour: Self::parse_timestamp(&hour_str),
                    total_orders: row.get(1)?,
                    total_revenue: row.get(2)?,
                    avg_order_value: row.get(3)?,
                    unique_customers: row.get(4)?,
                    updated_at: Self::parse_timestamp(&updated_str),
                })
            })
            .map_err(|e| WarehouseError::Database(e.to_string()))?;

        let mut metrics = Vec::new();
        for row in rows {
            metrics.push(row.map_err(|e| WarehouseError::Database(e.to_string()))?);
        }
        Ok(metrics)
    }
}

impl DimensionStore for SqliteWarehouse {
    fn customer_tier(&self, customer_id: &str) -> Result<Option<String>, WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT customer_tier FROM dim_customers WHERE customer_id = ?",
            params![customer_id],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(WarehouseError::Database(other.to_string())),
        })
    }

    fn product(&self, product_id: &str) -> Result<Option<ProductRecord>, WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT product_id, product_name, category, price, stock_level
             FROM dim_products WHERE product_id = ?",
            params![product_id],
            |row| {
                Ok(ProductRecord {
                    product_id: row.get(0)?,
                    product_name: row.get(1)?,
                    category: row.get(2)?,
                    price: row.get(3)?,
                    stock_level: row.get(4)?,
                })
            },
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(WarehouseError::Database(other.to_string())),
        })
    }

    fn upsert_customer(&self, customer: &CustomerRecord) -> Result<(), WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO dim_customers
             (customer_id, name, email, registration_date, customer_tier)
             VALUES (?, ?, ?, ?, ?)",
            params![
                customer.customer_id,
                customer.name,
                customer.email,
                customer.registration_date.to_string(),
                customer.customer_tier,
            ],
        )
        .map_err(|e| WarehouseError::Database(e.to_string()))?;
        Ok(())
    }

    fn upsert_product(&self, product: &ProductRecord) -> Result<(), WarehouseError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO dim_products
             (product_id, product_name, category, price, stock_level)
             VALUES (?, ?, ?, ?, ?)",
            params![
                product.product_id,
                product.product_name,
                product.category,
                product.price,
                product.stock_level,
            ],
        )
        .map_err(|e| WarehouseError::Database(e.to_string()))?;
        Ok(())
    }
}
