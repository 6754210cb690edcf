use async_trait::async_trait;
use pharma_core::catalog::{ProductCatalog, ProductSnapshot};
use pharma_core::{CoreError, CoreResult};
use rust_decimal::Decimal;
use tonic::transport::Channel;
use tracing::debug;
use uuid::Uuid;

use crate::grpc::{self, status_to_core};
use crate::proto::product::product_service_client::ProductServiceClient;
use crate::proto::product::{GetProductRequest, Product, UpdateStockRequest};

/// Largest unit price the `NUMERIC(12,2)` price columns can hold.
fn max_unit_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

#[derive(Debug, Clone)]
pub struct GrpcProductCatalog {
    client: ProductServiceClient<Channel>,
}

impl GrpcProductCatalog {
    pub fn connect_lazy(url: &str) -> Result<Self, tonic::transport::Error> {
        Ok(Self {
            client: ProductServiceClient::new(grpc::lazy_channel(url)?),
        })
    }
}

#[async_trait]
impl ProductCatalog for GrpcProductCatalog {
    async fn get_product(&self, product_id: Uuid) -> CoreResult<ProductSnapshot> {
        let request = tonic::Request::new(GetProductRequest {
            product_id: product_id.to_string(),
        });
        let response = self
            .client
            .clone()
            .get_product(request)
            .await
            .map_err(|status| status_to_core("product service", status))?
            .into_inner();

        let product = response
            .product
            .ok_or_else(|| CoreError::NotFound(format!("product {} not found", product_id)))?;
        to_snapshot(product_id, product)
    }

    async fn update_stock(&self, product_id: Uuid, quantity_delta: i32, reason: &str) -> CoreResult<()> {
        let request = tonic::Request::new(UpdateStockRequest {
            product_id: product_id.to_string(),
            quantity: quantity_delta,
            reason: reason.to_string(),
        });
        let response = self
            .client
            .clone()
            .update_stock(request)
            .await
            .map_err(|status| status_to_core("product service", status))?
            .into_inner();

        if !response.success {
            return Err(CoreError::Internal(format!(
                "product service rejected stock update for {}: {}",
                product_id, response.message
            )));
        }
        debug!(%product_id, quantity_delta, reason, "stock update acknowledged");
        Ok(())
    }
}

fn to_snapshot(product_id: Uuid, product: Product) -> CoreResult<ProductSnapshot> {
    let price = Decimal::from_f64_retain(product.price)
        .map(|price| price.round_dp(2))
        .filter(|price| !price.is_sign_negative() && *price <= max_unit_price())
        .ok_or_else(|| {
            CoreError::Internal(format!("product {} has an invalid price {}", product_id, product.price))
        })?;

    Ok(ProductSnapshot {
        id: product_id,
        name: product.name,
        stock: product.stock,
        price,
        requires_prescription: product.requires_prescription,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64) -> Product {
        Product {
            id: String::new(),
            name: "Ibuprofen".to_string(),
            price,
            stock: 12,
            requires_prescription: false,
        }
    }

    #[test]
    fn test_price_becomes_two_place_decimal() {
        let id = Uuid::new_v4();
        let snapshot = to_snapshot(id, product(15.0)).unwrap();
        assert_eq!(snapshot.price, Decimal::new(1500, 2));
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.stock, 12);

        let snapshot = to_snapshot(id, product(9.99)).unwrap();
        assert_eq!(snapshot.price, Decimal::new(999, 2));
    }

    #[test]
    fn test_invalid_price_is_internal() {
        assert!(matches!(to_snapshot(Uuid::new_v4(), product(f64::NAN)), Err(CoreError::Internal(_))));
        assert!(matches!(to_snapshot(Uuid::new_v4(), product(-1.0)), Err(CoreError::Internal(_))));
    }

    #[test]
    fn test_price_beyond_column_range_is_internal() {
        assert!(matches!(to_snapshot(Uuid::new_v4(), product(1e28)), Err(CoreError::Internal(_))));
        assert!(matches!(to_snapshot(Uuid::new_v4(), product(1e10)), Err(CoreError::Internal(_))));
        assert!(to_snapshot(Uuid::new_v4(), product(9_999_999.5)).is_ok());
    }
}
