//! PostgreSQL default value backend.
//!
//! Table structure:
//! - `variable_defaults(key TEXT PRIMARY KEY, value TEXT NOT NULL,
//!   description TEXT, updated_at TIMESTAMPTZ NOT NULL)`

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::postgres::PostgresPool;

use super::backend::{validate_key, DefaultValue, DefaultValueBackend, DefaultsError};

pub struct PostgresDefaultsBackend {
    pool: Arc<PostgresPool>,
}

impl PostgresDefaultsBackend {
    pub fn new(pool: Arc<PostgresPool>) -> Self {
        Self { pool }
    }

    /// Create the table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DefaultsError> {
        self.pool
            .execute_with_circuit_breaker(|pool| async move {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS variable_defaults (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL,
                        description TEXT,
                        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    )
                    "#,
                )
                .execute(&pool)
                .await
            })
            .await?;

        tracing::info!("variable_defaults table ready");
        Ok(())
    }
}

#[async_trait]
impl DefaultValueBackend for PostgresDefaultsBackend {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, DefaultsError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, String)> = self
            .pool
            .execute_with_circuit_breaker(|pool| async move {
                sqlx::query_as("SELECT key, value FROM variable_defaults WHERE key = ANY($1)")
                    .bind(keys)
                    .fetch_all(&pool)
                    .await
            })
            .await?;

        Ok(rows.into_iter().collect())
    }

    async fn list(&self) -> Result<Vec<DefaultValue>, DefaultsError> {
        let rows: Vec<(String, String, Option<String>, DateTime<Utc>)> = self
            .pool
            .execute_with_circuit_breaker(|pool| async move {
                sqlx::query_as(
                    "SELECT key, value, description, updated_at FROM variable_defaults ORDER BY key",
                )
                .fetch_all(&pool)
                .await
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(key, value, description, updated_at)| DefaultValue {
                key,
                value,
                description,
                updated_at,
            })
            .collect())
    }

    async fn upsert(&self, mut value: DefaultValue) -> Result<DefaultValue, DefaultsError> {
        validate_key(&value.key)?;
        value.updated_at = Utc::now();

        let row = value.clone();
        self.pool
            .execute_with_circuit_breaker(|pool| async move {
                sqlx::query(
                    r#"
                    INSERT INTO variable_defaults (key, value, description, updated_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (key) DO UPDATE
                    SET value = EXCLUDED.value,
                        description = EXCLUDED.description,
                        updated_at = EXCLUDED.updated_at
                    "#,
                )
                .bind(&row.key)
                .bind(&row.value)
                .bind(&row.description)
                .bind(row.updated_at)
                .execute(&pool)
                .await
            })
            .await?;

        tracing::debug!(key = %value.key, "Default value stored");
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), DefaultsError> {
        let result = self
            .pool
            .execute_with_circuit_breaker(|pool| async move {
                sqlx::query("DELETE FROM variable_defaults WHERE key = $1")
                    .bind(key)
                    .execute(&pool)
                    .await
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DefaultsError::NotFound(key.to_string()));
        }

        Ok(())
    }
}
