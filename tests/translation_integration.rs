//! Placeholder-preserving translation: tokenizer round trips, the workflows
//! over templates and lessons, and the HTTP client against a local fake
//! provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use lesson_mailer::config::TranslationConfig;
use lesson_mailer::resilience::BreakerState;
use lesson_mailer::template::{CreateTemplateRequest, Template};
use lesson_mailer::translation::{
    content_hash, HttpTranslator, LessonContent, LessonNode, Tokenizer, TranslationError,
    TranslationService, TranslationStore, Translator, TranslatorError,
};

/// Reverses the word order, keeping tokens as they are. Enough to prove that
/// placeholders survive reordering.
struct ReversingTranslator;

#[async_trait]
impl Translator for ReversingTranslator {
    async fn translate(
        &self,
        text: &str,
        _target_language: &str,
        _source_language: Option<&str>,
    ) -> Result<String, TranslatorError> {
        Ok(text.split(' ').rev().collect::<Vec<_>>().join(" "))
    }
}

/// Drops every token from the text.
struct TokenEatingTranslator;

#[async_trait]
impl Translator for TokenEatingTranslator {
    async fn translate(
        &self,
        text: &str,
        _target_language: &str,
        _source_language: Option<&str>,
    ) -> Result<String, TranslatorError> {
        Ok(text
            .split(' ')
            .filter(|w| !w.starts_with("XVAR"))
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Succeeds `ok_calls` times, then fails with a provider error.
struct FlakyTranslator {
    calls: AtomicUsize,
    ok_calls: usize,
}

#[async_trait]
impl Translator for FlakyTranslator {
    async fn translate(
        &self,
        text: &str,
        _target_language: &str,
        _source_language: Option<&str>,
    ) -> Result<String, TranslatorError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.ok_calls {
            Ok(format!("[de] {}", text))
        } else {
            Err(TranslatorError::Status {
                status: 503,
                body: "overloaded".to_string(),
            })
        }
    }
}

fn service(translator: Arc<dyn Translator>) -> TranslationService {
    TranslationService::new(translator, Tokenizer::default(), Arc::new(TranslationStore::new()))
}

fn lesson() -> LessonContent {
    LessonContent {
        lesson_id: "phishing-101".to_string(),
        language: Some("en".to_string()),
        title: "Intro to Phishing".to_string(),
        description: "Hello {{user_first_name}}".to_string(),
        nodes: vec![LessonNode {
            id: "q1".to_string(),
            text: "Which link is safe?".to_string(),
            answers: vec!["The first".to_string(), "The second".to_string()],
        }],
    }
}

#[tokio::test]
async fn test_repeated_placeholder_round_trip() {
    let service = service(Arc::new(ReversingTranslator));
    let outcome = service
        .translate_text("Hello {{name}}, {{name}} again", "fr", None)
        .await
        .unwrap();

    assert_eq!(outcome.placeholder_count, 2);
    assert_eq!(outcome.translated_text, "again {{name}} {{name}}, Hello");
    assert_eq!(outcome.source_hash, content_hash("Hello {{name}}, {{name}} again"));
}

#[tokio::test]
async fn test_placeholders_survive_byte_for_byte() {
    let service = service(Arc::new(ReversingTranslator));
    let source = "{{ user_name }} {{lesson_title}} {{Weird-Key.1}}";
    let outcome = service.translate_text(source, "de", None).await.unwrap();

    for placeholder in ["{{ user_name }}", "{{lesson_title}}", "{{Weird-Key.1}}"] {
        assert_eq!(outcome.translated_text.matches(placeholder).count(), 1);
    }
}

#[tokio::test]
async fn test_digits_next_to_placeholders_are_kept() {
    let service = service(Arc::new(ReversingTranslator));
    let source = "You earned {{points}}0 points, {{bonus}}5 bonus, rank #{{rank}}1";
    let outcome = service.translate_text(source, "de", None).await.unwrap();

    assert_eq!(outcome.placeholder_count, 3);
    assert_eq!(
        outcome.translated_text,
        "#{{rank}}1 rank bonus, {{bonus}}5 points, {{points}}0 earned You"
    );
}

#[tokio::test]
async fn test_lost_token_is_a_mismatch() {
    let service = service(Arc::new(TokenEatingTranslator));
    let err = service
        .translate_text("Hi {{user_name}} there", "de", None)
        .await
        .unwrap_err();

    match err {
        TranslationError::PlaceholderMismatch(mismatch) => {
            assert_eq!(mismatch.missing, vec!["{{user_name}}"]);
            assert!(mismatch.duplicated.is_empty());
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let service = service(Arc::new(FlakyTranslator {
        calls: AtomicUsize::new(0),
        ok_calls: 0,
    }));
    let err = service.translate_text("Hello", "de", None).await.unwrap_err();
    assert!(matches!(
        err,
        TranslationError::Provider(TranslatorError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_translate_template_stores_subject_and_body() {
    let service = service(Arc::new(ReversingTranslator));
    let template = Template::from(CreateTemplateRequest {
        id: "reminder".to_string(),
        name: "Reminder".to_string(),
        category: "lesson_reminder".to_string(),
        subject: "Reminder {{lesson_title}}".to_string(),
        body: "Hi {{user_name}}".to_string(),
        language: "en".to_string(),
        description: None,
    });

    let translated = service.translate_template(&template, "DE").await.unwrap();
    assert_eq!(translated.language, "de");
    assert_eq!(translated.subject.translated_text, "{{lesson_title}} Reminder");
    assert_eq!(translated.body.translated_text, "{{user_name}} Hi");

    let store = service.store();
    assert_eq!(store.count(), 2);
    assert!(!store.is_stale("template:reminder", "de", "subject", &template.subject));
    assert!(store.is_stale("template:reminder", "de", "subject", "Reminder: {{lesson_title}}"));
}

#[tokio::test]
async fn test_translate_lesson_all_fields() {
    let service = service(Arc::new(FlakyTranslator {
        calls: AtomicUsize::new(0),
        ok_calls: usize::MAX,
    }));

    let translated = service.translate_lesson(&lesson(), "de").await.unwrap();
    assert_eq!(translated.title, "[de] Intro to Phishing");
    assert_eq!(translated.description, "[de] Hello {{user_first_name}}");
    assert_eq!(translated.nodes[0].answers[1], "[de] The second");
    assert_eq!(translated.language.as_deref(), Some("de"));

    let stored = service.store().list_for("lesson:phishing-101", "de");
    assert_eq!(stored.len(), 5);
}

#[tokio::test]
async fn test_translate_lesson_is_all_or_nothing() {
    let translator = Arc::new(FlakyTranslator {
        calls: AtomicUsize::new(0),
        ok_calls: 3,
    });
    let service = service(translator.clone());

    let result = service.translate_lesson(&lesson(), "de").await;
    assert!(result.is_err());
    // Fourth field failed; nothing after it was attempted
    assert_eq!(translator.calls.load(Ordering::SeqCst), 4);
    assert_eq!(service.store().count(), 0);
}

#[tokio::test]
async fn test_translate_lesson_rejects_duplicate_node_ids() {
    let service = service(Arc::new(ReversingTranslator));
    let mut lesson = lesson();
    lesson.nodes.push(lesson.nodes[0].clone());

    let err = service.translate_lesson(&lesson, "de").await.unwrap_err();
    assert!(matches!(err, TranslationError::DuplicateNodeId(_)));
    assert_eq!(service.store().count(), 0);
}

async fn deepl_fake(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("DeepL-Auth-Key test-key");
    if !authorized {
        return (StatusCode::FORBIDDEN, Json(json!({"message": "forbidden"})));
    }

    let text = body["text"][0].as_str().unwrap_or_default();
    let target = body["target_lang"].as_str().unwrap_or_default();
    if text.contains("fail") {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"message": "try later"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "translations": [{"detected_source_language": "EN", "text": format!("{}: {}", target, text)}]
        })),
    )
}

async fn spawn_fake_provider() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/v2/translate", post(deepl_fake));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v2/translate", addr)
}

fn client_config(endpoint: String, api_key: &str) -> TranslationConfig {
    TranslationConfig {
        endpoint,
        api_key: Some(api_key.to_string()),
        timeout_seconds: 5,
        failure_threshold: 2,
        reset_timeout_seconds: 60,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_http_translator_against_fake_provider() {
    let endpoint = spawn_fake_provider().await;
    let translator = Arc::new(HttpTranslator::new(&client_config(endpoint, "test-key")).unwrap());
    let service = service(translator.clone());

    let outcome = service
        .translate_text("Hi {{user_name}}", "de", Some("en"))
        .await
        .unwrap();
    assert_eq!(outcome.translated_text, "DE: Hi {{user_name}}");
    assert_eq!(translator.breaker().state(), BreakerState::Closed);
}

#[tokio::test]
async fn test_http_translator_client_error_does_not_trip_breaker() {
    let endpoint = spawn_fake_provider().await;
    let translator = HttpTranslator::new(&client_config(endpoint, "wrong-key")).unwrap();

    for _ in 0..3 {
        let err = translator.translate("Hello", "de", None).await.unwrap_err();
        assert!(matches!(err, TranslatorError::Status { status: 403, .. }));
    }
    assert_eq!(translator.breaker().state(), BreakerState::Closed);
}

#[tokio::test]
async fn test_http_translator_breaker_opens_after_failures() {
    let endpoint = spawn_fake_provider().await;
    let translator = HttpTranslator::new(&client_config(endpoint, "test-key")).unwrap();

    for _ in 0..2 {
        let err = translator.translate("please fail", "de", None).await.unwrap_err();
        assert!(matches!(err, TranslatorError::Status { status: 503, .. }));
    }
    assert_eq!(translator.breaker().state(), BreakerState::Open);

    let err = translator.translate("Hello", "de", None).await.unwrap_err();
    assert!(matches!(err, TranslatorError::Unavailable(_)));
}

#[tokio::test]
async fn test_http_translator_unreachable_provider() {
    // Nothing listens on port 9 (discard) on loopback in test environments
    let config = TranslationConfig {
        timeout_seconds: 1,
        ..client_config("http://127.0.0.1:9/v2/translate".to_string(), "test-key")
    };
    let translator = HttpTranslator::new(&config).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        translator.translate("Hello", "de", None),
    )
    .await
    .unwrap();
    assert!(matches!(result, Err(TranslatorError::Request(_))));
}
