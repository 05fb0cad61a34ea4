//! In-memory default value backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::backend::{validate_key, DefaultValue, DefaultValueBackend, DefaultsError};

#[derive(Default)]
pub struct MemoryDefaultsBackend {
    values: DashMap<String, DefaultValue>,
}

impl MemoryDefaultsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with `(key, value)` pairs; invalid keys are skipped.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let backend = Self::new();
        for (key, value) in values {
            let value = DefaultValue::new(key, value);
            if validate_key(&value.key).is_ok() {
                backend.values.insert(value.key.clone(), value);
            }
        }
        backend
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl DefaultValueBackend for MemoryDefaultsBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, DefaultsError> {
        Ok(keys
            .iter()
            .filter_map(|key| {
                self.values
                    .get(key)
                    .map(|entry| (key.clone(), entry.value.clone()))
            })
            .collect())
    }

    async fn list(&self) -> Result<Vec<DefaultValue>, DefaultsError> {
        let mut values: Vec<DefaultValue> =
            self.values.iter().map(|entry| entry.value().clone()).collect();
        values.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(values)
    }

    async fn upsert(&self, mut value: DefaultValue) -> Result<DefaultValue, DefaultsError> {
        validate_key(&value.key)?;
        value.updated_at = Utc::now();
        self.values.insert(value.key.clone(), value.clone());
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), DefaultsError> {
        self.values
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| DefaultsError::NotFound(key.to_string()))
    }
}
