use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use pharma_api::{app, AppState};
use pharma_order::OrderOrchestrator;
use pharma_rpc::{GrpcPaymentAdapter, GrpcProductCatalog};
use pharma_store::app_config::Config;
use pharma_store::{DbClient, StoreOrderRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pharma_api=debug,pharma_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting order service on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;

    let store = Arc::new(StoreOrderRepository::new(db.pool.clone()));
    let catalog = GrpcProductCatalog::connect_lazy(&config.services.product_url)
        .context("Invalid product service address")?;
    let payments = GrpcPaymentAdapter::connect_lazy(&config.services.payment_url)
        .context("Invalid payment service address")?;

    let orchestrator = OrderOrchestrator::new(store.clone(), store, Arc::new(catalog), Arc::new(payments));
    let app = app(AppState::new(orchestrator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
