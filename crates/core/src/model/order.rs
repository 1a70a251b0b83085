//! The fixed order input schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single order as it arrives from the source, one per NDJSON line.
///
/// `order_id` is globally unique once committed to the fact store; it may
/// transiently repeat in staging across retried loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub order_id: String,
    /// Customer placing the order.
    pub customer_id: String,
    /// When the order was placed. Also determines the processing window.
    pub order_timestamp: DateTime<Utc>,
    /// Ordered line items.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Recorded order total as reported by the source.
    pub total_amount: f64,
    /// Payment status as reported by the source (free-form).
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Shipping address, absent for digital orders.
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

/// A line within an order. No identity of its own; contributes one fact row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Shipping address attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

impl Order {
    /// Sum of `quantity * unit_price` over the line items, rounded to cents.
    ///
    /// An order with zero items yields 0.0; callers compare that literally
    /// against `total_amount` without special-casing.
    pub fn calculated_total(&self) -> f64 {
        let sum: f64 = self
            .items
            .iter()
            .map(|item| item.quantity as f64 * item.unit_price)
            .sum();
        round_cents(sum)
    }

    /// State code from the shipping address, if any.
    pub fn state(&self) -> Option<&str> {
        self.shipping_address.as_ref().map(|a| a.state.as_str())
    }
}

/// Round a monetary amount to two decimal places.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
