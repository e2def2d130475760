use anyhow::Context;
use tokio::net::TcpListener;

use crate::app::{self, AppState};
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting readlog in {:?} mode", config.environment);
    tracing::info!("Database: {}", config.redacted_database_url());

    let pool = DatabaseManager::connect(&config.database).await?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("readlog listening on http://{}", bind_addr);

    let state = AppState::new(pool.clone(), config);
    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
