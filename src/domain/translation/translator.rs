//! Translator abstraction.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("Translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Translation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Translation provider returned no text")]
    EmptyResponse,

    #[error("Translation provider unavailable: {0}")]
    Unavailable(String),

    #[error("Translation provider is not configured")]
    NotConfigured,
}

impl TranslatorError {
    /// Whether the failure says something about provider health.
    pub fn is_upstream_failure(&self) -> bool {
        match self {
            TranslatorError::Request(_) | TranslatorError::EmptyResponse => true,
            TranslatorError::Status { status, .. } => *status >= 500 || *status == 429,
            TranslatorError::Unavailable(_) | TranslatorError::NotConfigured => false,
        }
    }
}

/// Plain-text machine translation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`. `source_language` of `None`
    /// lets the provider detect it.
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String, TranslatorError>;
}
