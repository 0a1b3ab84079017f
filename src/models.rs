//! Restaurant, menu and order records
//!
//! Records read from the store carry a public `id`. Orders embed a snapshot
//! of each item's name and price at order time.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Order status values.
///
/// Only [`order_status::PENDING`] is ever written; later stages are reserved
/// and no transitions are enforced.
pub mod order_status {
    pub const PENDING: &str = "pending";
    pub const CONFIRMED: &str = "confirmed";
    pub const PREPARING: &str = "preparing";
    pub const OUT_FOR_DELIVERY: &str = "out_for_delivery";
    pub const DELIVERED: &str = "delivered";
    pub const CANCELLED: &str = "cancelled";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Restaurant {
    #[schema(example = "demo-1")]
    pub id: String,
    #[schema(example = "SnackSprint Diner")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "American")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 4.7)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MenuItem {
    #[schema(example = "m1")]
    pub id: String,
    /// Owning restaurant
    #[schema(example = "demo-1")]
    pub restaurant_id: String,
    #[schema(example = "Classic Burger")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(example = 9.99)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    /// Category tag such as Pizza, Burger, Drinks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Line item embedded in an order, captured at order time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OrderItem {
    #[schema(example = "m1")]
    pub item_id: String,
    #[schema(example = "Classic Burger")]
    pub name: String,
    #[schema(example = 9.99)]
    pub price: f64,
    /// Values below 1 count as 1 when totalling
    #[serde(deserialize_with = "deserialize_whole_number")]
    #[schema(example = 2)]
    pub quantity: i64,
}

/// Integer, also accepted as a float with no fractional part (`2.0`).
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WholeNumber {
        Int(i64),
        Float(f64),
    }

    match WholeNumber::deserialize(deserializer)? {
        WholeNumber::Int(n) => Ok(n),
        WholeNumber::Float(f)
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Ok(f as i64)
        }
        WholeNumber::Float(f) => Err(D::Error::custom(format!(
            "expected a whole number, got {}",
            f
        ))),
    }
}

impl OrderItem {
    pub fn effective_quantity(&self) -> i64 {
        self.quantity.max(1)
    }
}

/// Order submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OrderRequest {
    #[schema(example = "demo-1")]
    pub restaurant_id: String,
    #[schema(example = "Ada Lovelace")]
    pub customer_name: String,
    #[schema(example = "+1 555 0100")]
    pub phone: String,
    #[schema(example = "12 Analytical Way")]
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
}

/// Order document as persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub restaurant_id: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: String,
}

impl Order {
    /// Build a pending order, computing its total.
    pub fn from_request(request: OrderRequest) -> Result<Self, OrderError> {
        let total = compute_total(&request.items)?;
        Ok(Self {
            restaurant_id: request.restaurant_id,
            customer_name: request.customer_name,
            phone: request.phone,
            address: request.address,
            notes: request.notes,
            items: request.items,
            total,
            status: order_status::PENDING.to_string(),
        })
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum OrderError {
    #[error("Invalid price {price} for item {item_id}")]
    InvalidPrice { item_id: String, price: f64 },

    #[error("Order total overflow")]
    Overflow,
}

/// Sum of `price × max(1, quantity)`, rounded to 2 decimal places.
///
/// Summed in `f64`; the exact binary sum is then rounded half to even, so
/// `2.675` (stored as 2.67499999...) totals `2.67`.
/// No taxes, discounts or delivery fees are applied.
pub fn compute_total(items: &[OrderItem]) -> Result<f64, OrderError> {
    let mut total = 0.0_f64;
    for item in items {
        if !item.price.is_finite() {
            return Err(OrderError::InvalidPrice {
                item_id: item.item_id.clone(),
                price: item.price,
            });
        }
        total += item.effective_quantity() as f64 * item.price;
    }
    if !total.is_finite() {
        return Err(OrderError::Overflow);
    }
    Ok(round_to_cents(total))
}

fn round_to_cents(value: f64) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(exact) => exact.round_dp(2).to_string().parse().unwrap_or(value),
        // beyond Decimal's range every f64 is already integral
        None => value,
    }
}
