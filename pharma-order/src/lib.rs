pub mod models;
pub mod pricing;
pub mod transitions;
pub mod repository;
pub mod orchestrator;
pub mod mock;

pub use models::{NewOrder, Order, OrderDraft, OrderItem, OrderResponse, OrderStatus, RequestedItem};
pub use orchestrator::{OrderOrchestrator, OrderPage, PlacedOrder};
pub use repository::{OrderItemRepository, OrderRepository};
