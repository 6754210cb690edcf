use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pharma_core::{CoreError, CoreResult, ListQuery};
use pharma_order::{Order, OrderDraft, OrderItem, OrderItemRepository, OrderRepository, OrderStatus};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::list_sql;

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    status: String,
    prescription_url: Option<String>,
    subtotal: Decimal,
    shipping_cost: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = CoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|_| CoreError::Internal(format!("order {} has unrecognized status '{}'", row.id, row.status)))?;

        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            status,
            prescription_url: row.prescription_url,
            subtotal: row.subtotal,
            shipping_cost: row.shipping_cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

fn db_error(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {}", err))
}

fn order_not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("Order with ID '{}' not found", id))
}

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn create_order(&self, order: &OrderDraft) -> CoreResult<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, status, prescription_url, subtotal, shipping_cost)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.status.as_str())
        .bind(order.prescription_url.as_deref())
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(order.id)
    }

    async fn get_order_by_id(&self, id: Uuid) -> CoreResult<(Order, Vec<OrderItem>)> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            list_sql::ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| order_not_found(id))?;

        let order = Order::try_from(row)?;
        let items = self.get_items_by_order_id(id).await?;
        Ok((order, items))
    }

    async fn list_orders(&self, query: &ListQuery) -> CoreResult<(Vec<Order>, i64)> {
        let mut count = list_sql::select_count(query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let mut page = list_sql::select_page(query);
        let rows: Vec<OrderRow> = page
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok((orders, total))
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<()> {
        let result = sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(order_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderItemRepository for StoreOrderRepository {
    async fn add_order_item(&self, item: &OrderItem) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, product_id, product_name, quantity, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.product_name.as_str())
        .bind(item.quantity)
        .bind(item.price)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_items_by_order_id(&self, order_id: Uuid) -> CoreResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, product_name, quantity, price FROM order_items WHERE order_id = $1 ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }
}
