use async_trait::async_trait;
use pharma_core::payment::{CheckoutLink, PaymentAdapter};
use pharma_core::CoreResult;
use tonic::transport::Channel;
use uuid::Uuid;

use crate::grpc::{self, status_to_core};
use crate::proto::payment::payment_service_client::PaymentServiceClient;
use crate::proto::payment::GeneratePaymentUrlRequest;

#[derive(Debug, Clone)]
pub struct GrpcPaymentAdapter {
    client: PaymentServiceClient<Channel>,
}

impl GrpcPaymentAdapter {
    pub fn connect_lazy(url: &str) -> Result<Self, tonic::transport::Error> {
        Ok(Self {
            client: PaymentServiceClient::new(grpc::lazy_channel(url)?),
        })
    }
}

#[async_trait]
impl PaymentAdapter for GrpcPaymentAdapter {
    async fn generate_payment_url(&self, order_id: Uuid, customer_id: Uuid) -> CoreResult<CheckoutLink> {
        let request = tonic::Request::new(GeneratePaymentUrlRequest {
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
        });
        let response = self
            .client
            .clone()
            .generate_payment_url(request)
            .await
            .map_err(|status| status_to_core("payment service", status))?
            .into_inner();

        Ok(CheckoutLink {
            url: response.url,
            success: response.success,
            error: response.error,
        })
    }
}
