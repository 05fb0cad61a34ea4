//! PostgreSQL connection pool with circuit breaker integration.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::resilience::CircuitBreaker;

#[derive(Debug, Error)]
pub enum PostgresPoolError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Circuit breaker is open")]
    CircuitOpen,

    #[error("Database URL is not configured")]
    NotConfigured,
}

/// PostgreSQL connection pool guarded by a circuit breaker.
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
    circuit_breaker: Arc<CircuitBreaker>,
    database_url: String,
}

impl PostgresPool {
    /// Connect using `config.url`.
    pub async fn connect(
        config: &DatabaseConfig,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, PostgresPoolError> {
        let url = config.url.as_deref().ok_or(PostgresPoolError::NotConfigured)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds as u64))
            .connect(url)
            .await?;

        let pool = Self {
            pool,
            circuit_breaker,
            database_url: url.to_string(),
        };

        tracing::info!(
            pool_size = config.pool_size,
            url = %pool.database_url_masked(),
            "PostgreSQL connection pool created"
        );

        Ok(pool)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn is_available(&self) -> bool {
        self.circuit_breaker.allow_request()
    }

    /// Run `operation` unless the breaker is open, recording its outcome.
    pub async fn execute_with_circuit_breaker<T, F, Fut>(
        &self,
        operation: F,
    ) -> Result<T, PostgresPoolError>
    where
        F: FnOnce(PgPool) -> Fut,
        Fut: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        if !self.circuit_breaker.allow_request() {
            return Err(PostgresPoolError::CircuitOpen);
        }

        match operation(self.pool.clone()).await {
            Ok(result) => {
                self.circuit_breaker.record_success();
                Ok(result)
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                Err(PostgresPoolError::Sqlx(e))
            }
        }
    }

    /// Database URL with the password masked, for logging.
    pub fn database_url_masked(&self) -> String {
        mask_url(&self.database_url)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }
}

fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            // "postgres://host" has its only colon before "//", not a password
            if !url[colon_pos..].starts_with("://") {
                return format!("{}***{}", &url[..colon_pos + 1], &url[at_pos..]);
            }
        }
    }
    url.to_string()
}
