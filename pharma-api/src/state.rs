use std::sync::Arc;

use pharma_order::OrderOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderOrchestrator>,
}

impl AppState {
    pub fn new(orders: OrderOrchestrator) -> Self {
        Self {
            orders: Arc::new(orders),
        }
    }
}
