use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use pharma_core::query::{ListParams, RawFilter};
use pharma_core::CoreError;
use pharma_order::{NewOrder, OrderPage, OrderResponse, OrderStatus, PlacedOrder, RequestedItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::caller::Caller;
use crate::envelope::{self, Reply};
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_id: Uuid,
    pub prescription_url: Option<String>,
    #[serde(default)]
    pub items: Vec<RequestedItem>,
}

/// Flat listing parameters as they appear in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<i32>,
    pub limit: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub filter_column: Option<String>,
    pub filter_operator: Option<String>,
    pub filter_value: Option<String>,
}

impl From<ListOrdersQuery> for ListParams {
    fn from(query: ListOrdersQuery) -> Self {
        ListParams {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(0),
            sort_by: query.sort_by,
            sort_order: query.sort_order,
            filter: RawFilter::new(
                query.filter_column.unwrap_or_default(),
                query.filter_operator.unwrap_or_default(),
                query.filter_value.unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct PaymentUrl {
    pub order_id: Uuid,
    pub payment_url: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", post(place_order).get(list_all_orders))
        .route("/v1/orders/{id}", get(get_order))
        .route("/v1/orders/{id}/status", patch(update_order_status))
        .route("/v1/orders/{id}/payment-url", post(generate_payment_url))
        .route("/v1/customers/{customer_id}/orders", get(list_customers_orders))
}

/// POST /v1/orders
pub async fn place_order(
    State(state): State<AppState>,
    Caller(requester): Caller,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Reply<PlacedOrder>, AppError> {
    let Json(req) = payload.map_err(|e| CoreError::BadRequest(e.body_text()))?;

    let order = NewOrder {
        customer_id: req.customer_id,
        prescription_url: req.prescription_url.filter(|url| !url.trim().is_empty()),
    };
    let placed = state.orders.place_order(&requester, order, req.items).await?;
    Ok(envelope::created(placed))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Caller(requester): Caller,
    id: Result<Path<String>, PathRejection>,
) -> Result<Reply<OrderResponse>, AppError> {
    let order_id = parse_id(id, "id")?;
    let order = state.orders.get_order(&requester, order_id).await?;
    Ok(envelope::ok(order))
}

/// GET /v1/customers/{customer_id}/orders
pub async fn list_customers_orders(
    State(state): State<AppState>,
    Caller(requester): Caller,
    customer_id: Result<Path<String>, PathRejection>,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Reply<OrderPage>, AppError> {
    let customer_id = parse_id(customer_id, "customer_id")?;
    let params = list_params(query)?;
    let page = state
        .orders
        .list_customers_orders(&requester, customer_id, &params)
        .await?;
    Ok(envelope::ok(page))
}

/// GET /v1/orders
pub async fn list_all_orders(
    State(state): State<AppState>,
    Caller(requester): Caller,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Reply<OrderPage>, AppError> {
    let params = list_params(query)?;
    let page = state.orders.list_all_orders(&requester, &params).await?;
    Ok(envelope::ok(page))
}

/// PATCH /v1/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Caller(requester): Caller,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Reply<StatusUpdated>, AppError> {
    let order_id = parse_id(id, "id")?;
    let Json(req) = payload.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    let status: OrderStatus = req.status.parse()?;

    state
        .orders
        .update_order_status(&requester, order_id, status)
        .await?;
    Ok(envelope::ok(StatusUpdated { order_id, status }))
}

/// POST /v1/orders/{id}/payment-url
pub async fn generate_payment_url(
    State(state): State<AppState>,
    Caller(requester): Caller,
    id: Result<Path<String>, PathRejection>,
) -> Result<Reply<PaymentUrl>, AppError> {
    let order_id = parse_id(id, "id")?;
    let payment_url = state
        .orders
        .generate_new_payment_url(&requester, order_id)
        .await?;
    Ok(envelope::ok(PaymentUrl { order_id, payment_url }))
}

fn parse_id(path: Result<Path<String>, PathRejection>, field: &str) -> Result<Uuid, CoreError> {
    let Path(raw) = path.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    Uuid::parse_str(raw.trim()).map_err(|_| CoreError::validation(field, format!("'{}' is not a valid UUID", raw)))
}

fn list_params(query: Result<Query<ListOrdersQuery>, QueryRejection>) -> Result<ListParams, CoreError> {
    let Query(query) = query.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    Ok(query.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_first_page_unbounded() {
        let params: ListParams = ListOrdersQuery::default().into();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 0);
        assert!(params.filter.is_empty());
        assert!(params.sort_by.is_none());
    }

    #[test]
    fn test_query_carries_filter_triple() {
        let params: ListParams = ListOrdersQuery {
            page: Some(2),
            limit: Some(5),
            sort_by: Some("subtotal".into()),
            sort_order: Some("desc".into()),
            filter_column: Some("status".into()),
            filter_operator: Some("eq".into()),
            filter_value: Some("paid".into()),
        }
        .into();
        assert_eq!(params.filter, RawFilter::new("status", "eq", "paid"));
        assert_eq!((params.page, params.limit), (2, 5));
    }
}
