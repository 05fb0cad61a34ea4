//! Template CRUD, per-template rendering and translation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{
    is_valid_language, CreateTemplateRequest, RenderedEmail, SubstitutionContext, Template,
    TemplateListResponse, UpdateTemplateRequest,
};
use crate::translation::{normalize_language, template_resource_id, TranslatedTemplate};

/// POST /api/v1/templates - Create a new template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(template_id = %request.id)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>)> {
    let created = state.template_store.create(request.into())?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.template_store.list();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    Ok(Json(state.template_store.get(&id)?))
}

/// PUT /api/v1/templates/{id} - Update an existing template
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<Template>> {
    Ok(Json(state.template_store.update(&id, request)?))
}

/// DELETE /api/v1/templates/{id} - Delete a template and its translations
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.template_store.delete(&id)?;
    let removed = state
        .translations
        .store()
        .remove_resource(&template_resource_id(&id));
    if removed > 0 {
        tracing::debug!(translations = removed, "Dropped translations of deleted template");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderTemplateRequest {
    #[serde(default)]
    pub context: SubstitutionContext,
    pub language: Option<String>,
}

/// POST /api/v1/templates/{id}/render - Render subject and body for one recipient
#[tracing::instrument(name = "http.render_template", skip(state, request))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderedEmail>> {
    if let Some(language) = &request.language {
        require_language(language)?;
    }

    let rendered = state
        .renderer
        .render(&id, &request.context, request.language.as_deref())
        .await?;
    Ok(Json(rendered))
}

#[derive(Debug, Deserialize)]
pub struct TranslateTemplateRequest {
    pub language: String,
}

/// POST /api/v1/templates/{id}/translations - Translate subject and body and store them
#[tracing::instrument(name = "http.translate_template", skip(state, request), fields(language = %request.language))]
pub async fn translate_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TranslateTemplateRequest>,
) -> Result<(StatusCode, Json<TranslatedTemplate>)> {
    require_language(&request.language)?;
    let template = state.template_store.get(&id)?;

    let translated = state
        .translations
        .translate_template(&template, &request.language)
        .await?;
    Ok((StatusCode::CREATED, Json(translated)))
}

#[derive(Debug, Serialize)]
pub struct TemplateTranslationResponse {
    pub template_id: String,
    pub language: String,
    pub subject: String,
    pub body: String,
    /// True when the template changed after this translation was made
    pub stale: bool,
}

/// GET /api/v1/templates/{id}/translations/{language} - Stored translation with staleness
#[tracing::instrument(name = "http.get_template_translation", skip(state))]
pub async fn get_template_translation(
    State(state): State<AppState>,
    Path((id, language)): Path<(String, String)>,
) -> Result<Json<TemplateTranslationResponse>> {
    let template = state.template_store.get(&id)?;
    let store = state.translations.store();
    let resource_id = template_resource_id(&id);

    let (Some(subject), Some(body)) = (
        store.get(&resource_id, &language, "subject"),
        store.get(&resource_id, &language, "body"),
    ) else {
        return Err(AppError::NotFound(format!(
            "No {} translation for template {}",
            language, id
        )));
    };

    let stale = store.is_stale(&resource_id, &language, "subject", &template.subject)
        || store.is_stale(&resource_id, &language, "body", &template.body);

    Ok(Json(TemplateTranslationResponse {
        template_id: id,
        language: normalize_language(&language),
        subject: subject.translated_text,
        body: body.translated_text,
        stale,
    }))
}

pub(crate) fn require_language(code: &str) -> Result<()> {
    if is_valid_language(code.trim()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid language code: {}", code)))
    }
}
