use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreResult;

/// Result of asking the payment service for a checkout page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutLink {
    pub url: String,
    pub success: bool,
    pub error: Option<String>,
}

#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    /// Issue a checkout URL for an order. A transport failure is an `Err`;
    /// a provider-side refusal comes back as `success == false`.
    async fn generate_payment_url(&self, order_id: Uuid, customer_id: Uuid) -> CoreResult<CheckoutLink>;
}
