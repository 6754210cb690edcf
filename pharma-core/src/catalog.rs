use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreResult;

/// Audit tag sent with every stock decrement issued for a new order.
pub const STOCK_REASON_ORDER_PLACED: &str = "order_placed";

/// What the product service knows about a product right now.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
    pub price: Decimal,
    pub requires_prescription: bool,
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fails with `NotFound` when the product does not exist.
    async fn get_product(&self, product_id: Uuid) -> CoreResult<ProductSnapshot>;

    /// Apply a signed stock delta. `reason` is a free-text audit tag.
    async fn update_stock(&self, product_id: Uuid, quantity_delta: i32, reason: &str) -> CoreResult<()>;
}
