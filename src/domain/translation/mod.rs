//! Variable-preserving machine translation.
//!
//! Placeholders are swapped for opaque tokens before text reaches the
//! translator and swapped back afterwards, so `{{user_name}}` can never come
//! back as `{{nom_utilisateur}}`. Translated texts are stored together with
//! the hash of their source so a later edit marks them stale.
//!
//! # Example
//!
//! ```ignore
//! let service = TranslationService::new(translator, Tokenizer::default(), store);
//! let outcome = service.translate_text("Hi {{user_name}}", "de", Some("en")).await?;
//! assert!(outcome.translated_text.contains("{{user_name}}"));
//! ```

mod hash;
mod http_translator;
mod lesson;
mod service;
mod store;
mod tokenizer;
mod translator;

pub use hash::content_hash;
pub use http_translator::HttpTranslator;
pub use lesson::{LessonContent, LessonNode};
pub use service::{TranslatedTemplate, TranslationError, TranslationOutcome, TranslationService};
pub use store::{
    create_translation_store, lesson_resource_id, normalize_language, template_resource_id,
    StoredTranslation, TranslationStore,
};
pub use tokenizer::{
    PlaceholderMismatch, TokenizedText, Tokenizer, TokenizerError, VariableMap,
    DEFAULT_TOKEN_PREFIX,
};
pub use translator::{Translator, TranslatorError};
