//! Stored translations keyed by resource, language and field.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hash::content_hash;

/// Resource id under which template translations are stored.
pub fn template_resource_id(template_id: &str) -> String {
    format!("template:{}", template_id)
}

/// Resource id under which lesson translations are stored.
pub fn lesson_resource_id(lesson_id: &str) -> String {
    format!("lesson:{}", lesson_id)
}

/// Language codes are compared case-insensitively.
pub fn normalize_language(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTranslation {
    pub id: Uuid,
    pub resource_id: String,
    pub language: String,
    pub field: String,
    /// SHA-256 hex of the source text that was translated
    pub source_hash: String,
    pub translated_text: String,
    pub translated_at: DateTime<Utc>,
}

impl StoredTranslation {
    pub fn new(
        resource_id: impl Into<String>,
        language: &str,
        field: impl Into<String>,
        source_hash: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_id: resource_id.into(),
            language: normalize_language(language),
            field: field.into(),
            source_hash: source_hash.into(),
            translated_text: translated_text.into(),
            translated_at: Utc::now(),
        }
    }
}

type TranslationKey = (String, String, String);

fn key(resource_id: &str, language: &str, field: &str) -> TranslationKey {
    (
        resource_id.to_string(),
        normalize_language(language),
        field.to_string(),
    )
}

/// In-memory translation storage
pub struct TranslationStore {
    translations: DashMap<TranslationKey, StoredTranslation>,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStore {
    pub fn new() -> Self {
        Self {
            translations: DashMap::new(),
        }
    }

    /// Insert or replace the translation for its (resource, language, field).
    pub fn put(&self, translation: StoredTranslation) -> StoredTranslation {
        let k = key(
            &translation.resource_id,
            &translation.language,
            &translation.field,
        );
        self.translations.insert(k, translation.clone());
        crate::metrics::STORED_TRANSLATIONS_TOTAL.set(self.translations.len() as i64);
        translation
    }

    pub fn put_all(&self, translations: Vec<StoredTranslation>) -> Vec<StoredTranslation> {
        translations.into_iter().map(|t| self.put(t)).collect()
    }

    pub fn get(&self, resource_id: &str, language: &str, field: &str) -> Option<StoredTranslation> {
        self.translations
            .get(&key(resource_id, language, field))
            .map(|t| t.clone())
    }

    /// All fields stored for one resource in one language, ordered by field.
    pub fn list_for(&self, resource_id: &str, language: &str) -> Vec<StoredTranslation> {
        let language = normalize_language(language);
        let mut found: Vec<StoredTranslation> = self
            .translations
            .iter()
            .filter(|entry| entry.resource_id == resource_id && entry.language == language)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.field.cmp(&b.field));
        found
    }

    /// A translation is stale when it is missing or was made from a source
    /// text other than `current_source`.
    pub fn is_stale(
        &self,
        resource_id: &str,
        language: &str,
        field: &str,
        current_source: &str,
    ) -> bool {
        match self.translations.get(&key(resource_id, language, field)) {
            Some(stored) => stored.source_hash != content_hash(current_source),
            None => true,
        }
    }

    /// The translated text, only if it is not stale.
    pub fn fresh(
        &self,
        resource_id: &str,
        language: &str,
        field: &str,
        current_source: &str,
    ) -> Option<String> {
        let hash = content_hash(current_source);
        self.translations
            .get(&key(resource_id, language, field))
            .filter(|stored| stored.source_hash == hash)
            .map(|stored| stored.translated_text.clone())
    }

    /// Drop every translation of a resource. Returns how many were removed.
    pub fn remove_resource(&self, resource_id: &str) -> usize {
        let before = self.translations.len();
        self.translations.retain(|(resource, _, _), _| resource != resource_id);
        let removed = before.saturating_sub(self.translations.len());
        crate::metrics::STORED_TRANSLATIONS_TOTAL.set(self.translations.len() as i64);
        removed
    }

    pub fn count(&self) -> usize {
        self.translations.len()
    }
}

/// Create an Arc-wrapped translation store
pub fn create_translation_store() -> Arc<TranslationStore> {
    Arc::new(TranslationStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(field: &str, source: &str, text: &str) -> StoredTranslation {
        StoredTranslation::new(
            template_resource_id("welcome"),
            "DE",
            field,
            content_hash(source),
            text,
        )
    }

    #[test]
    fn test_put_and_get_normalizes_language() {
        let store = TranslationStore::new();
        store.put(stored("subject", "Welcome", "Willkommen"));

        let found = store.get("template:welcome", "de", "subject").unwrap();
        assert_eq!(found.translated_text, "Willkommen");
        assert_eq!(found.language, "de");
        assert!(store.get("template:welcome", "fr", "subject").is_none());
    }

    #[test]
    fn test_put_replaces_same_field() {
        let store = TranslationStore::new();
        store.put(stored("subject", "Welcome", "Willkommen"));
        store.put(stored("subject", "Welcome!", "Willkommen!"));

        assert_eq!(store.count(), 1);
        assert_eq!(
            store.get("template:welcome", "de", "subject").unwrap().translated_text,
            "Willkommen!"
        );
    }

    #[test]
    fn test_staleness_follows_source_text() {
        let store = TranslationStore::new();
        store.put(stored("body", "Hi {{user_name}}", "Hallo {{user_name}}"));

        assert!(!store.is_stale("template:welcome", "de", "body", "Hi {{user_name}}"));
        assert!(store.is_stale("template:welcome", "de", "body", "Hello {{user_name}}"));
        assert!(store.is_stale("template:welcome", "de", "subject", "anything"));

        assert_eq!(
            store.fresh("template:welcome", "de", "body", "Hi {{user_name}}").as_deref(),
            Some("Hallo {{user_name}}")
        );
        assert!(store.fresh("template:welcome", "de", "body", "changed").is_none());
    }

    #[test]
    fn test_list_for_and_remove_resource() {
        let store = TranslationStore::new();
        store.put_all(vec![
            stored("subject", "s", "S"),
            stored("body", "b", "B"),
            StoredTranslation::new("template:other", "de", "body", content_hash("x"), "X"),
        ]);

        let fields: Vec<String> = store
            .list_for("template:welcome", "de")
            .into_iter()
            .map(|t| t.field)
            .collect();
        assert_eq!(fields, vec!["body", "subject"]);

        assert_eq!(store.remove_resource("template:welcome"), 2);
        assert_eq!(store.count(), 1);
    }
}
