// Care Finder - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use care_finder::{api::build_router, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,care_finder=debug,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Care Finder API");

    let config = Config::from_env().context("Failed to load configuration")?;
    let catalog = config.load_catalog()?;
    tracing::info!(providers = catalog.len(), "Provider catalog loaded");

    let app = build_router(catalog.into_records());

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    tracing::info!(addr = %config.addr, "Server running");
    tracing::info!("   API: http://{}/api/providers", config.addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
