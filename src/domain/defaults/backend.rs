//! Backend trait for admin-defined placeholder default values.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::postgres::PostgresPoolError;

#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("Invalid default key: {0}")]
    InvalidKey(String),

    #[error("Default value not found: {0}")]
    NotFound(String),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Backend is temporarily unavailable (e.g., circuit breaker open)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl From<PostgresPoolError> for DefaultsError {
    fn from(err: PostgresPoolError) -> Self {
        match err {
            PostgresPoolError::Sqlx(e) => DefaultsError::Postgres(e),
            other => DefaultsError::Unavailable(other.to_string()),
        }
    }
}

/// Value used for `{{key}}` when no context data provides one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValue {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl DefaultValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Keys are 1-64 characters of ASCII alphanumerics or underscore.
pub fn validate_key(key: &str) -> Result<(), DefaultsError> {
    if key.is_empty() || key.len() > 64 {
        return Err(DefaultsError::InvalidKey(
            "Key must be 1-64 characters".to_string(),
        ));
    }

    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DefaultsError::InvalidKey(format!(
            "{}: only alphanumeric and underscore allowed",
            key
        )));
    }

    Ok(())
}

#[async_trait]
pub trait DefaultValueBackend: Send + Sync {
    /// Short identifier used in health output and logs.
    fn backend_type(&self) -> &'static str;

    /// Values for the requested keys; keys without a default are absent.
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, DefaultsError>;

    /// All defaults, ordered by key.
    async fn list(&self) -> Result<Vec<DefaultValue>, DefaultsError>;

    /// Keys that currently have a default, ordered.
    async fn keys(&self) -> Result<Vec<String>, DefaultsError> {
        Ok(self.list().await?.into_iter().map(|d| d.key).collect())
    }

    /// Insert or replace the default for `value.key`.
    async fn upsert(&self, value: DefaultValue) -> Result<DefaultValue, DefaultsError>;

    async fn delete(&self, key: &str) -> Result<(), DefaultsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("company_motto").is_ok());
        assert!(validate_key("Year2026").is_ok());
        assert!(matches!(validate_key(""), Err(DefaultsError::InvalidKey(_))));
        assert!(matches!(
            validate_key("has space"),
            Err(DefaultsError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key(&"k".repeat(65)),
            Err(DefaultsError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_pool_error_conversion() {
        let err: DefaultsError = PostgresPoolError::CircuitOpen.into();
        assert!(matches!(err, DefaultsError::Unavailable(_)));
    }
}
