//! DeepL-compatible HTTP translator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::TranslationConfig;
use crate::metrics::TranslationMetrics;
use crate::resilience::{CircuitBreaker, CircuitBreakerConfig};

use super::translator::{Translator, TranslatorError};

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
    preserve_formatting: bool,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedItem>,
}

#[derive(Debug, Deserialize)]
struct TranslatedItem {
    text: String,
}

pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    breaker: Arc<CircuitBreaker>,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let breaker = CircuitBreaker::with_config(
            "translator",
            CircuitBreakerConfig {
                failure_threshold: config.failure_threshold,
                reset_timeout: Duration::from_secs(config.reset_timeout_seconds),
                ..Default::default()
            },
        );

        if config.api_key.is_none() {
            tracing::warn!("No translation API key configured, translation requests will fail");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            breaker: Arc::new(breaker),
        })
    }

    pub fn breaker(&self) -> Arc<CircuitBreaker> {
        self.breaker.clone()
    }

    async fn send(
        &self,
        api_key: &str,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String, TranslatorError> {
        let request = TranslateRequest {
            text: [text],
            target_lang: target_language.to_ascii_uppercase(),
            source_lang: source_language.map(provider_source_language),
            preserve_formatting: true,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslatorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranslateResponse = response.json().await?;
        parsed
            .translations
            .into_iter()
            .next()
            .map(|item| item.text)
            .ok_or(TranslatorError::EmptyResponse)
    }
}

/// Source languages are sent without region (`en-GB` -> `EN`).
fn provider_source_language(code: &str) -> String {
    code.split('-').next().unwrap_or(code).to_ascii_uppercase()
}

#[async_trait]
impl Translator for HttpTranslator {
    #[tracing::instrument(
        name = "translator.translate",
        skip(self, text),
        fields(chars = text.len())
    )]
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String, TranslatorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranslatorError::NotConfigured)?;

        if !self.breaker.allow_request() {
            TranslationMetrics::record_unavailable();
            return Err(TranslatorError::Unavailable(
                "circuit breaker open".to_string(),
            ));
        }

        let started = Instant::now();
        let result = self
            .send(api_key, text, target_language, source_language)
            .await;

        match &result {
            Ok(_) => {
                self.breaker.record_success();
                TranslationMetrics::record_success(started.elapsed());
            }
            Err(e) => {
                if e.is_upstream_failure() {
                    self.breaker.record_failure();
                }
                TranslationMetrics::record_provider_error(started.elapsed());
                tracing::warn!(error = %e, "Translation provider call failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = TranslateRequest {
            text: ["Hallo XVAR0"],
            target_lang: "EN-GB".to_string(),
            source_lang: None,
            preserve_formatting: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"][0], "Hallo XVAR0");
        assert_eq!(json["target_lang"], "EN-GB");
        assert!(json.get("source_lang").is_none());
    }

    #[test]
    fn test_source_language_drops_region() {
        assert_eq!(provider_source_language("en-GB"), "EN");
        assert_eq!(provider_source_language("de"), "DE");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let translator = HttpTranslator::new(&TranslationConfig::default()).unwrap();
        let result = translator.translate("Hello", "de", None).await;
        assert!(matches!(result, Err(TranslatorError::NotConfigured)));
    }
}
