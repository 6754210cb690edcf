//! In-memory collaborators for tests and local runs.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use pharma_core::catalog::{ProductCatalog, ProductSnapshot};
use pharma_core::payment::{CheckoutLink, PaymentAdapter};
use pharma_core::query::{Comparison, FilterValue, OrderColumn, Predicate, SortDirection};
use pharma_core::{CoreError, CoreResult, ListQuery, OrderScope};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Order, OrderDraft, OrderItem, OrderStatus};
use crate::repository::{OrderItemRepository, OrderRepository};

/// Order and order-item store backed by hash maps.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<Uuid, Order>>,
    items: Mutex<Vec<OrderItem>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order directly, bypassing placement.
    pub async fn insert_order(&self, order: Order) {
        self.orders.lock().await.insert(order.id, order);
    }

    pub async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }

    pub async fn item_count(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderStore {
    async fn create_order(&self, draft: &OrderDraft) -> CoreResult<Uuid> {
        let now = Utc::now();
        let order = Order {
            id: draft.id,
            customer_id: draft.customer_id,
            status: draft.status,
            prescription_url: draft.prescription_url.clone(),
            subtotal: draft.subtotal,
            shipping_cost: draft.shipping_cost,
            created_at: now,
            updated_at: now,
        };
        self.orders.lock().await.insert(order.id, order);
        Ok(draft.id)
    }

    async fn get_order_by_id(&self, id: Uuid) -> CoreResult<(Order, Vec<OrderItem>)> {
        let order = self
            .orders
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("Order with ID '{}' not found", id)))?;
        let items = self.get_items_by_order_id(id).await?;
        Ok((order, items))
    }

    async fn list_orders(&self, query: &ListQuery) -> CoreResult<(Vec<Order>, i64)> {
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .await
            .values()
            .filter(|order| match query.scope {
                OrderScope::All => true,
                OrderScope::Customer(customer_id) => order.customer_id == customer_id,
            })
            .filter(|order| query.filter.as_ref().map_or(true, |p| matches_predicate(order, p)))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = column_value(a, query.sort.column)
                .partial_cmp(&column_value(b, query.sort.column))
                .unwrap_or(Ordering::Equal);
            match query.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as i64;
        let page = match query.window() {
            Some(window) => matching
                .into_iter()
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .collect(),
            None => matching,
        };

        Ok((page, total))
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<()> {
        let mut orders = self.orders.lock().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(format!("Order with ID '{}' not found", id)))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl OrderItemRepository for InMemoryOrderStore {
    async fn add_order_item(&self, item: &OrderItem) -> CoreResult<()> {
        self.items.lock().await.push(item.clone());
        Ok(())
    }

    async fn get_items_by_order_id(&self, order_id: Uuid) -> CoreResult<Vec<OrderItem>> {
        Ok(self
            .items
            .lock()
            .await
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }
}

fn column_value(order: &Order, column: OrderColumn) -> Option<FilterValue> {
    match column {
        OrderColumn::Id => Some(FilterValue::Uuid(order.id)),
        OrderColumn::CustomerId => Some(FilterValue::Uuid(order.customer_id)),
        OrderColumn::Status => Some(FilterValue::Text(order.status.as_str().to_string())),
        OrderColumn::PrescriptionUrl => order.prescription_url.clone().map(FilterValue::Text),
        OrderColumn::Subtotal => Some(FilterValue::Money(order.subtotal)),
        OrderColumn::ShippingCost => Some(FilterValue::Money(order.shipping_cost)),
        OrderColumn::CreatedAt => Some(FilterValue::Timestamp(order.created_at)),
        OrderColumn::UpdatedAt => Some(FilterValue::Timestamp(order.updated_at)),
    }
}

fn matches_predicate(order: &Order, predicate: &Predicate) -> bool {
    let actual = column_value(order, predicate.column());

    match predicate {
        Predicate::Compare { op, value, .. } => actual.is_some_and(|actual| match op {
            Comparison::Eq => actual == *value,
            Comparison::Neq => actual != *value,
            Comparison::Gt => actual > *value,
            Comparison::Gte => actual >= *value,
            Comparison::Lt => actual < *value,
            Comparison::Lte => actual <= *value,
        }),
        Predicate::Like {
            pattern,
            case_insensitive,
            ..
        } => actual.is_some_and(|actual| {
            let needle = pattern.trim_matches('%');
            if *case_insensitive {
                actual.to_text().to_lowercase().contains(&needle.to_lowercase())
            } else {
                actual.to_text().contains(needle)
            }
        }),
        Predicate::In { values, .. } => actual.is_some_and(|actual| values.contains(&actual)),
        Predicate::IsNull(_) => actual.is_none(),
        Predicate::IsNotNull(_) => actual.is_some(),
    }
}

/// A stock change recorded by [`MockProductCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    pub product_id: Uuid,
    pub quantity_delta: i32,
    pub reason: String,
}

#[derive(Default)]
pub struct MockProductCatalog {
    products: Mutex<HashMap<Uuid, ProductSnapshot>>,
    stock_updates: Mutex<Vec<StockUpdate>>,
}

impl MockProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_product(&self, product: ProductSnapshot) {
        self.products.lock().await.insert(product.id, product);
    }

    pub async fn stock_of(&self, product_id: Uuid) -> Option<i32> {
        self.products.lock().await.get(&product_id).map(|p| p.stock)
    }

    pub async fn stock_updates(&self) -> Vec<StockUpdate> {
        self.stock_updates.lock().await.clone()
    }
}

#[async_trait]
impl ProductCatalog for MockProductCatalog {
    async fn get_product(&self, product_id: Uuid) -> CoreResult<ProductSnapshot> {
        self.products
            .lock()
            .await
            .get(&product_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("product {} not found", product_id)))
    }

    async fn update_stock(&self, product_id: Uuid, quantity_delta: i32, reason: &str) -> CoreResult<()> {
        let mut products = self.products.lock().await;
        let product = products
            .get_mut(&product_id)
            .ok_or_else(|| CoreError::NotFound(format!("product {} not found", product_id)))?;
        product.stock += quantity_delta;

        self.stock_updates.lock().await.push(StockUpdate {
            product_id,
            quantity_delta,
            reason: reason.to_string(),
        });
        Ok(())
    }
}

/// Payment adapter that hands out deterministic checkout URLs, or refuses
/// every request when built with [`MockPaymentAdapter::failing`].
#[derive(Default)]
pub struct MockPaymentAdapter {
    failure: Option<String>,
    requests: Mutex<Vec<(Uuid, Uuid)>>,
}

impl MockPaymentAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            requests: Mutex::default(),
        }
    }

    pub fn checkout_url_for(order_id: Uuid) -> String {
        format!("https://checkout.mock/pay/mock_cs_{}", order_id.simple())
    }

    /// `(order_id, customer_id)` pairs seen so far.
    pub async fn requests(&self) -> Vec<(Uuid, Uuid)> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PaymentAdapter for MockPaymentAdapter {
    async fn generate_payment_url(&self, order_id: Uuid, customer_id: Uuid) -> CoreResult<CheckoutLink> {
        self.requests.lock().await.push((order_id, customer_id));

        Ok(match &self.failure {
            Some(reason) => CheckoutLink {
                url: String::new(),
                success: false,
                error: Some(reason.clone()),
            },
            None => CheckoutLink {
                url: Self::checkout_url_for(order_id),
                success: true,
                error: None,
            },
        })
    }
}
