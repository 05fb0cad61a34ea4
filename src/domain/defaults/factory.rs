//! Default value backend factory

use std::sync::Arc;

use crate::config::DefaultsConfig;
use crate::postgres::PostgresPool;

use super::backend::DefaultValueBackend;
use super::memory_backend::MemoryDefaultsBackend;
use super::postgres_backend::PostgresDefaultsBackend;

/// Create a default value backend based on configuration.
///
/// - `"postgres"`: `PostgresDefaultsBackend` if a pool is provided
/// - `"memory"` (default): `MemoryDefaultsBackend`
pub fn create_defaults_backend(
    settings: &DefaultsConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn DefaultValueBackend> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL defaults backend");
                Arc::new(PostgresDefaultsBackend::new(pool))
            } else {
                tracing::warn!(
                    "PostgreSQL defaults backend requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryDefaultsBackend::new())
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory defaults backend");
            Arc::new(MemoryDefaultsBackend::new())
        }
    }
}
