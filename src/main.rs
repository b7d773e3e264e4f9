use anyhow::{Context, Result};
use row_translations::api::{self, AppState};
use row_translations::{Config, Database, LanguageManager};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("row_translations=info".parse()?),
        )
        .init();

    info!("Starting translations API");

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;

    let languages = LanguageManager::new(db, &config.languages_table)?;
    languages
        .ensure_table()
        .await
        .context("Failed to prepare languages table")?;

    let addr = format!("0.0.0.0:{}", config.port);
    let prefix = config.api.prefix.clone();
    let app = api::router(AppState::new(languages, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✓ Listening on {} (routes under {})", addr, prefix);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
