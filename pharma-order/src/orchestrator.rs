use std::sync::Arc;

use pharma_core::catalog::{ProductCatalog, STOCK_REASON_ORDER_PLACED};
use pharma_core::payment::{CheckoutLink, PaymentAdapter};
use pharma_core::query::ListParams;
use pharma_core::{CoreError, CoreResult, ListQuery, OrderScope, Requester};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{NewOrder, OrderDraft, OrderItem, OrderResponse, OrderStatus, RequestedItem};
use crate::pricing;
use crate::repository::{OrderItemRepository, OrderRepository};
use crate::transitions;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub payment_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<OrderResponse>,
    pub total: i64,
    pub page: i32,
    pub limit: i32,
}

/// A stock decrement that has been sent to the product service.
/// Nothing reverses these if a later step fails.
#[derive(Debug, Clone, Copy)]
struct StockDecrement {
    product_id: Uuid,
    quantity: i32,
}

/// A validated line with its captured unit price, not yet tied to an order row.
struct PricedLine {
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    price: Decimal,
}

/// Coordinates the order store, the product catalog and the payment
/// service. Holds no mutable state of its own.
pub struct OrderOrchestrator {
    orders: Arc<dyn OrderRepository>,
    items: Arc<dyn OrderItemRepository>,
    catalog: Arc<dyn ProductCatalog>,
    payments: Arc<dyn PaymentAdapter>,
}

impl OrderOrchestrator {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        items: Arc<dyn OrderItemRepository>,
        catalog: Arc<dyn ProductCatalog>,
        payments: Arc<dyn PaymentAdapter>,
    ) -> Self {
        Self {
            orders,
            items,
            catalog,
            payments,
        }
    }

    /// Validate and reserve every line in order, persist the order and its
    /// items, then obtain a checkout link.
    ///
    /// Stock decrements and rows written before a failure are left in
    /// place; the failure is returned as-is.
    pub async fn place_order(
        &self,
        requester: &Requester,
        order: NewOrder,
        items: Vec<RequestedItem>,
    ) -> CoreResult<PlacedOrder> {
        requester.ensure_customer_access(order.customer_id)?;

        let mut decrements = Vec::new();
        let result = self.place_order_inner(order, &items, &mut decrements).await;

        if let Err(err) = &result {
            if !decrements.is_empty() {
                let reserved: Vec<String> = decrements
                    .iter()
                    .map(|d| format!("{}x{}", d.product_id, d.quantity))
                    .collect();
                warn!(
                    error = %err,
                    ?reserved,
                    "order placement failed after stock was decremented; decrements are not compensated"
                );
            }
        }

        result
    }

    async fn place_order_inner(
        &self,
        order: NewOrder,
        items: &[RequestedItem],
        decrements: &mut Vec<StockDecrement>,
    ) -> CoreResult<PlacedOrder> {
        if items.is_empty() {
            return Err(CoreError::validation("items", "an order needs at least one item"));
        }

        let prescription_url = order
            .prescription_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let mut lines = Vec::with_capacity(items.len());
        let mut subtotal = Decimal::ZERO;

        // Each line is checked against the stock left by earlier lines.
        for (index, requested) in items.iter().enumerate() {
            let product_id = validate_item(index, requested)?;

            let product = self.catalog.get_product(product_id).await?;

            if product.stock < requested.quantity {
                return Err(CoreError::validation(
                    format!("items[{}].quantity", index),
                    format!(
                        "insufficient stock for product {}: requested {}, available {}",
                        product_id, requested.quantity, product.stock
                    ),
                ));
            }

            if product.requires_prescription && prescription_url.is_none() {
                return Err(CoreError::validation(
                    "prescription_url",
                    format!("product {} requires a prescription", requested.product_name.trim()),
                ));
            }

            subtotal = product
                .price
                .checked_mul(Decimal::from(requested.quantity))
                .and_then(|line_total| subtotal.checked_add(line_total))
                .ok_or_else(|| {
                    CoreError::validation(
                        format!("items[{}].quantity", index),
                        format!("order total out of range for product {}", product_id),
                    )
                })?;

            self.catalog
                .update_stock(product_id, -requested.quantity, STOCK_REASON_ORDER_PLACED)
                .await?;
            decrements.push(StockDecrement {
                product_id,
                quantity: requested.quantity,
            });
            debug!(%product_id, quantity = requested.quantity, "stock decremented");

            lines.push(PricedLine {
                product_id,
                product_name: requested.product_name.trim().to_string(),
                quantity: requested.quantity,
                price: product.price,
            });
        }

        let draft = OrderDraft {
            id: Uuid::new_v4(),
            customer_id: order.customer_id,
            status: OrderStatus::PaymentPending,
            prescription_url,
            subtotal,
            shipping_cost: pricing::shipping_cost(subtotal),
        };
        let order_id = self.orders.create_order(&draft).await?;

        for line in lines {
            let item = OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                price: line.price,
            };
            self.items.add_order_item(&item).await?;
        }

        let link = self
            .payments
            .generate_payment_url(order_id, draft.customer_id)
            .await?;
        let payment_url = checkout_url(link)?;

        info!(
            %order_id,
            customer_id = %draft.customer_id,
            subtotal = %draft.subtotal,
            shipping_cost = %draft.shipping_cost,
            "order placed"
        );

        Ok(PlacedOrder { order_id, payment_url })
    }

    pub async fn get_order(&self, requester: &Requester, order_id: Uuid) -> CoreResult<OrderResponse> {
        let (order, items) = self.orders.get_order_by_id(order_id).await?;
        requester.ensure_customer_access(order.customer_id)?;
        Ok(OrderResponse::new(order, items))
    }

    pub async fn list_customers_orders(
        &self,
        requester: &Requester,
        customer_id: Uuid,
        params: &ListParams,
    ) -> CoreResult<OrderPage> {
        requester.ensure_customer_access(customer_id)?;
        let query = ListQuery::build(OrderScope::Customer(customer_id), params)?;
        self.list(&query).await
    }

    pub async fn list_all_orders(&self, requester: &Requester, params: &ListParams) -> CoreResult<OrderPage> {
        requester.ensure_admin()?;
        let query = ListQuery::build(OrderScope::All, params)?;
        self.list(&query).await
    }

    async fn list(&self, query: &ListQuery) -> CoreResult<OrderPage> {
        let (orders, total) = self.orders.list_orders(query).await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items.get_items_by_order_id(order.id).await?;
            responses.push(OrderResponse::new(order, items));
        }

        Ok(OrderPage {
            orders: responses,
            total,
            page: query.pagination.page,
            limit: query.pagination.limit,
        })
    }

    pub async fn update_order_status(
        &self,
        requester: &Requester,
        order_id: Uuid,
        target: OrderStatus,
    ) -> CoreResult<()> {
        let (order, _) = self.orders.get_order_by_id(order_id).await?;

        transitions::authorize_transition(requester, order.customer_id, order.status, target)?;

        self.orders.update_order_status(order_id, target).await?;
        info!(%order_id, from = %order.status, to = %target, by = %requester, "order status updated");
        Ok(())
    }

    /// Issue a fresh checkout link for an order that is still awaiting payment.
    pub async fn generate_new_payment_url(&self, requester: &Requester, order_id: Uuid) -> CoreResult<String> {
        let (order, _) = self.orders.get_order_by_id(order_id).await?;
        requester.ensure_customer_access(order.customer_id)?;

        if order.status != OrderStatus::PaymentPending {
            return Err(CoreError::Conflict(format!("order {} has already been paid for", order_id)));
        }

        let link = self
            .payments
            .generate_payment_url(order.id, order.customer_id)
            .await?;
        checkout_url(link)
    }
}

fn validate_item(index: usize, item: &RequestedItem) -> CoreResult<Uuid> {
    if item.quantity <= 0 {
        return Err(CoreError::validation(
            format!("items[{}].quantity", index),
            "quantity must be greater than zero",
        ));
    }
    if item.product_name.trim().is_empty() {
        return Err(CoreError::validation(
            format!("items[{}].product_name", index),
            "product name is required",
        ));
    }
    Uuid::parse_str(item.product_id.trim()).map_err(|_| {
        CoreError::validation(
            format!("items[{}].product_id", index),
            format!("'{}' is not a valid product id", item.product_id),
        )
    })
}

fn checkout_url(link: CheckoutLink) -> CoreResult<String> {
    if link.success {
        Ok(link.url)
    } else {
        Err(CoreError::Internal(format!(
            "payment service failed to issue a checkout link: {}",
            link.error.unwrap_or_else(|| "no reason given".to_string())
        )))
    }
}
