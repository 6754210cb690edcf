use async_trait::async_trait;
use pharma_core::{CoreResult, ListQuery};
use uuid::Uuid;

use crate::models::{Order, OrderDraft, OrderItem, OrderStatus};

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(&self, order: &OrderDraft) -> CoreResult<Uuid>;

    /// Fails with `NotFound` when no order has this id.
    async fn get_order_by_id(&self, id: Uuid) -> CoreResult<(Order, Vec<OrderItem>)>;

    /// One page of orders plus the number of matching orders before paging.
    async fn list_orders(&self, query: &ListQuery) -> CoreResult<(Vec<Order>, i64)>;

    /// Fails with `NotFound` when no row was updated.
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<()>;
}

/// Repository trait for order item data access
#[async_trait]
pub trait OrderItemRepository: Send + Sync {
    async fn add_order_item(&self, item: &OrderItem) -> CoreResult<()>;

    async fn get_items_by_order_id(&self, order_id: Uuid) -> CoreResult<Vec<OrderItem>>;
}
