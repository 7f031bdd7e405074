//! ShopEasy - storefront service

use std::sync::Arc;

use anyhow::Result;
use shopeasy::{cart_store, events::EventPublisher, store::{DataService, MemoryStore, PgStore}, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;

    let data: Arc<dyn DataService> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url, config.db_max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory data service; nothing will be persisted");
            Arc::new(MemoryStore::new())
        }
    };

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => { tracing::warn!(error = %e, "NATS unavailable, events disabled"); None }
        },
        None => None,
    };

    let addr = config.socket_addr();
    let cart_idle_timeout = config.cart_idle_timeout;
    let state = AppState::new(data, EventPublisher::new(nats), config);
    tokio::spawn(cart_store::run_reaper(state.carts.clone(), cart_idle_timeout));
    let app = shopeasy::router(state);

    tracing::info!("ShopEasy listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
