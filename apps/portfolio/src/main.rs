mod config;
mod errors;
mod pages;
mod profile;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::profile::repository::Repository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the document store; the file is seeded on first read
    let store = FileStore::new(&config.data_path);
    info!("Data file: {}", store.path().display());

    let state = AppState {
        repo: Arc::new(Repository::new(Arc::new(store))),
        config: config.clone(),
    };

    // Build router; unmatched paths fall through to the static directory
    info!("Static files: {}", config.static_dir.display());
    let app = build_router(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
