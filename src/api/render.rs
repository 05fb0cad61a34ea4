//! Ad-hoc substitution, placeholder validation and the variable catalogue.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::server::AppState;
use crate::template::{SubstitutionContext, ValidationResult, VariableInfo, BUILTIN_VARIABLES};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub template: String,
    #[serde(default)]
    pub context: SubstitutionContext,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub result: String,
}

/// POST /api/v1/render - Substitute placeholders in arbitrary text
#[tracing::instrument(name = "http.render", skip(state, request), fields(chars = request.template.len()))]
pub async fn render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Json<RenderResponse> {
    let result = state
        .substituter
        .substitute(&request.template, &request.context)
        .await;
    Json(RenderResponse { result })
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub template: String,
}

/// POST /api/v1/validate - Report placeholders nothing would resolve
#[tracing::instrument(name = "http.validate", skip(state, request))]
pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidationResult> {
    Json(state.substituter.validate(&request.template).await)
}

#[derive(Debug, Serialize)]
pub struct VariablesResponse {
    pub variables: &'static [VariableInfo],
    /// Keys with an admin-defined default; empty if the store is unreachable
    pub defaults: Vec<String>,
}

/// GET /api/v1/variables - Built-in keys plus keys with a default value
#[tracing::instrument(name = "http.list_variables", skip(state))]
pub async fn list_variables(State(state): State<AppState>) -> Json<VariablesResponse> {
    let defaults = state.defaults.keys().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not list default keys");
        Vec::new()
    });

    Json(VariablesResponse {
        variables: BUILTIN_VARIABLES,
        defaults,
    })
}
