//! Free-text and lesson translation endpoints.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::Result;
use crate::server::AppState;
use crate::translation::{LessonContent, TranslationOutcome};

use super::template::require_language;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub language: String,
    pub source_language: Option<String>,
}

/// POST /api/v1/translate - Translate text keeping its placeholders intact
#[tracing::instrument(
    name = "http.translate",
    skip(state, request),
    fields(language = %request.language, chars = request.text.len())
)]
pub async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslationOutcome>> {
    require_language(&request.language)?;
    if let Some(source) = &request.source_language {
        require_language(source)?;
    }

    let outcome = state
        .translations
        .translate_text(
            &request.text,
            &request.language,
            request.source_language.as_deref(),
        )
        .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct TranslateLessonRequest {
    pub lesson: LessonContent,
    pub language: String,
}

/// POST /api/v1/lessons/translate - Translate every field of a lesson
#[tracing::instrument(
    name = "http.translate_lesson",
    skip(state, request),
    fields(lesson_id = %request.lesson.lesson_id, language = %request.language)
)]
pub async fn translate_lesson(
    State(state): State<AppState>,
    Json(request): Json<TranslateLessonRequest>,
) -> Result<Json<LessonContent>> {
    require_language(&request.language)?;

    let translated = state
        .translations
        .translate_lesson(&request.lesson, &request.language)
        .await?;
    Ok(Json(translated))
}
