//! Booky Server - Book Catalog API
//!
//! A Rust REST API server for managing books, authors and publications.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booky_server::{
    api,
    config::AppConfig,
    services::Services,
    store::{memory::MemoryStore, redb::RedbStore, RecordStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("booky_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Booky Server v{}", env!("CARGO_PKG_VERSION"));

    // Select the record store backend
    let store: Arc<dyn RecordStore> = if config.database.url == "memory" {
        tracing::info!("Using the in-memory record store");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!("Opening record store at {}", config.database.url);
        Arc::new(RedbStore::open(&config.database.url)?)
    };

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(store)),
    };

    // Build router
    let app = api::create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
