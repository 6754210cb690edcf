pub mod app_config;
pub mod database;
pub mod list_sql;
pub mod order_repo;

pub use database::DbClient;
pub use order_repo::StoreOrderRepository;
