use anyhow::Context;
use tracing_subscriber::EnvFilter;

use invoice_link_api::config::{config, StoreBackend};
use invoice_link_api::{is_production, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, STORE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config = config();
    tracing::info!("Starting invoice-link-api in {:?} mode", config.environment);
    if is_production!() && config.store.backend == StoreBackend::Memory {
        tracing::warn!("Production is running on the in-memory store; data will not persist");
    }

    let state = AppState::from_config(config).await?;
    let app = server::router(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("invoice-link-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
