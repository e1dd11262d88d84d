//! Gauge Lending Server - REST API for lending measurement gauges

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gauge_server::{
    api,
    config::{AppConfig, StoreBackend},
    repository::Repository,
    store::{memory::MemoryStore, postgres::PgStore, TableStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gauge_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Gauge Lending Server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn TableStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => Arc::new(
            PgStore::connect(&config.store)
                .await
                .context("Failed to connect to gauge store")?,
        ),
    };

    // A store that cannot be read at startup is fatal
    Repository::new(store.clone())
        .verify()
        .await
        .context("Gauge store is not usable")?;

    tracing::info!("Connected to gauge store");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, store);
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
