//! Placeholder-safe translation of texts, templates and lessons.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::metrics::TranslationMetrics;
use crate::template::Template;

use super::hash::content_hash;
use super::lesson::LessonContent;
use super::store::{
    lesson_resource_id, normalize_language, template_resource_id, StoredTranslation,
    TranslationStore,
};
use super::tokenizer::{PlaceholderMismatch, Tokenizer, TokenizerError};
use super::translator::{Translator, TranslatorError};

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error(transparent)]
    Provider(#[from] TranslatorError),

    #[error("Placeholders were not preserved by the translator: {0}")]
    PlaceholderMismatch(PlaceholderMismatch),

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error("Lesson has more than one node with id {0:?}")]
    DuplicateNodeId(String),
}

/// Result of translating one text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub translated_text: String,
    /// SHA-256 hex of the source text
    pub source_hash: String,
    pub target_language: String,
    pub placeholder_count: usize,
}

/// Subject and body of a template in another language, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct TranslatedTemplate {
    pub template_id: String,
    pub language: String,
    pub subject: StoredTranslation,
    pub body: StoredTranslation,
}

pub struct TranslationService {
    translator: Arc<dyn Translator>,
    tokenizer: Tokenizer,
    store: Arc<TranslationStore>,
}

impl TranslationService {
    pub fn new(
        translator: Arc<dyn Translator>,
        tokenizer: Tokenizer,
        store: Arc<TranslationStore>,
    ) -> Self {
        Self {
            translator,
            tokenizer,
            store,
        }
    }

    pub fn store(&self) -> &Arc<TranslationStore> {
        &self.store
    }

    /// Translate `text` keeping every `{{...}}` placeholder byte-for-byte.
    ///
    /// Whitespace-only text is returned as is without a provider call.
    pub async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<TranslationOutcome, TranslationError> {
        let target_language = normalize_language(target_language);
        let source_hash = content_hash(text);

        if text.trim().is_empty() {
            return Ok(TranslationOutcome {
                translated_text: text.to_string(),
                source_hash,
                target_language,
                placeholder_count: 0,
            });
        }

        let tokenized = self.tokenizer.tokenize(text)?;
        let translated = self
            .translator
            .translate(&tokenized.text, &target_language, source_language)
            .await?;

        let restored = self
            .tokenizer
            .restore(&translated, &tokenized.variables)
            .map_err(|mismatch| {
                TranslationMetrics::record_mismatch();
                tracing::warn!(
                    target_language = %target_language,
                    missing = mismatch.missing.len(),
                    duplicated = mismatch.duplicated.len(),
                    "Translator did not preserve placeholders"
                );
                TranslationError::PlaceholderMismatch(mismatch)
            })?;

        Ok(TranslationOutcome {
            translated_text: restored,
            source_hash,
            target_language,
            placeholder_count: tokenized.variables.len(),
        })
    }

    /// Translate subject then body and store both under `template:<id>`.
    /// Nothing is stored if either fails.
    #[tracing::instrument(skip(self, template), fields(template_id = %template.id))]
    pub async fn translate_template(
        &self,
        template: &Template,
        target_language: &str,
    ) -> Result<TranslatedTemplate, TranslationError> {
        let source = Some(template.language.as_str());
        let subject = self
            .translate_text(&template.subject, target_language, source)
            .await?;
        let body = self
            .translate_text(&template.body, target_language, source)
            .await?;

        let resource_id = template_resource_id(&template.id);
        let language = subject.target_language.clone();
        let subject = self.store.put(StoredTranslation::new(
            resource_id.clone(),
            &language,
            "subject",
            subject.source_hash,
            subject.translated_text,
        ));
        let body = self.store.put(StoredTranslation::new(
            resource_id,
            &language,
            "body",
            body.source_hash,
            body.translated_text,
        ));

        tracing::info!(language = %language, "Template translated");

        Ok(TranslatedTemplate {
            template_id: template.id.clone(),
            language,
            subject,
            body,
        })
    }

    /// Translate every field of a lesson, one provider call per field.
    /// Results are stored under `lesson:<id>` only if all fields succeed.
    #[tracing::instrument(skip(self, lesson), fields(lesson_id = %lesson.lesson_id))]
    pub async fn translate_lesson(
        &self,
        lesson: &LessonContent,
        target_language: &str,
    ) -> Result<LessonContent, TranslationError> {
        if let Some(id) = lesson.duplicate_node_id() {
            return Err(TranslationError::DuplicateNodeId(id.to_string()));
        }

        let language = normalize_language(target_language);
        let source = lesson.language.as_deref();
        let fields = lesson.fields();

        let mut outcomes = Vec::with_capacity(fields.len());
        for field in &fields {
            let outcome = self
                .translate_text(field.text, &language, source)
                .await
                .inspect_err(|e| {
                    tracing::warn!(field = %field.name, error = %e, "Lesson field translation failed");
                })?;
            outcomes.push(outcome);
        }

        let resource_id = lesson_resource_id(&lesson.lesson_id);
        let mut texts = Vec::with_capacity(outcomes.len());
        let mut stored = Vec::with_capacity(outcomes.len());
        for (field, outcome) in fields.iter().zip(outcomes) {
            texts.push(outcome.translated_text.clone());
            stored.push(StoredTranslation::new(
                resource_id.clone(),
                &language,
                field.name.clone(),
                outcome.source_hash,
                outcome.translated_text,
            ));
        }
        self.store.put_all(stored);

        tracing::info!(language = %language, fields = texts.len(), "Lesson translated");

        Ok(lesson.with_translations(&language, texts))
    }
}
