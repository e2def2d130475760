use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// GET /health - process and database liveness
pub async fn get(State(state): State<AppState>) -> ApiResult<Health> {
    DatabaseManager::health_check(&state.pool).await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(ApiResponse::success(Health {
        status: "ok",
        database: "connected",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
