// Calendar API server

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use calendar_api::config::AppConfig;
use calendar_api::storage::StorageBackend;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("calendar_api=debug,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(environment = %config.environment, "calendar-api starting...");

    let db = match &config.database_url {
        Some(url) => {
            let db = StorageBackend::postgres(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database, migrations applied");
            db
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is not persisted)");
            StorageBackend::in_memory()
        }
    };

    if !config.http.cors_origins.is_empty() {
        tracing::info!(origins = ?config.http.cors_origins, "CORS origins configured");
    }

    let app = calendar_api::build_router(&config, db);

    let addr = format!("0.0.0.0:{}", config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
