use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the data-access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Translate a unique-constraint violation into a domain conflict.
    /// Any other error passes through unchanged.
    pub fn unique_as_conflict(err: sqlx::Error, message: impl FnOnce() -> String) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict(message())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }

    /// Translate a foreign-key violation into a not-found. Inserts hit this
    /// when the owner row was deleted while its token is still valid.
    pub fn foreign_key_as_not_found(self, message: impl FnOnce() -> String) -> Self {
        match &self {
            DatabaseError::Sqlx(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                DatabaseError::NotFound(message())
            }
            _ => self,
        }
    }
}

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connection pool construction and lifecycle for the application database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the pool. Connections are established eagerly so a bad URL fails
    /// at startup rather than on the first request.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = Self::pool_options(config).connect(&config.url).await?;
        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Build a pool that connects on first use.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        Ok(Self::pool_options(config).connect_lazy(&config.url)?)
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    /// Apply any pending embedded migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        MIGRATOR.run(pool).await?;
        info!("Database migrations are up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_unique_errors_pass_through() {
        let err = DatabaseError::unique_as_conflict(sqlx::Error::RowNotFound, || "dup".to_string());
        assert!(matches!(err, DatabaseError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn foreign_key_translation_leaves_other_errors_alone() {
        let err = DatabaseError::Sqlx(sqlx::Error::RowNotFound).foreign_key_as_not_found(|| "No user: 1".into());
        assert!(matches!(err, DatabaseError::Sqlx(sqlx::Error::RowNotFound)));

        let err = DatabaseError::Conflict("dup".into()).foreign_key_as_not_found(|| "No user: 1".into());
        assert!(matches!(err, DatabaseError::Conflict(msg) if msg == "dup"));
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        let config = DatabaseConfig {
            url: "postgres://nobody@127.0.0.1:1/none".to_string(),
            max_connections: 1,
            connection_timeout: 1,
            run_migrations: false,
        };
        let pool = DatabaseManager::connect_lazy(&config).unwrap();
        assert_eq!(pool.size(), 0);
    }
}
