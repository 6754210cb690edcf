use std::str::FromStr;

use chrono::{DateTime, Utc};
use pharma_core::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PaymentPending,
    Approved,
    Paid,
    #[serde(alias = "shipping")]
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::PaymentPending,
        OrderStatus::Approved,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PaymentPending => "payment_pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payment_pending" => Ok(OrderStatus::PaymentPending),
            "approved" => Ok(OrderStatus::Approved),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" | "shipping" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CoreError::validation("status", format!("unknown order status '{}'", other))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted order. Timestamps are owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub prescription_url: Option<String>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn total(&self) -> Decimal {
        self.subtotal + self.shipping_cost
    }
}

/// An order row about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub prescription_url: Option<String>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
}

/// One product line within an order. `price` is the unit price captured
/// when the order was placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order proposal as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub prescription_url: Option<String>,
}

/// Requested line, before any validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestedItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
}

/// Read model joining an order with its items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub prescription_url: Option<String>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            order_id: order.id,
            customer_id: order.customer_id,
            status: order.status,
            total: order.total(),
            prescription_url: order.prescription_url,
            subtotal: order.subtotal,
            shipping_cost: order.shipping_cost,
            items,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
