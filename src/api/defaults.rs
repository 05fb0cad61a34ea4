//! Admin-defined default value endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::defaults::{validate_key, DefaultValue};
use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct DefaultsListResponse {
    pub defaults: Vec<DefaultValue>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct PutDefaultRequest {
    pub value: String,
    pub description: Option<String>,
}

/// GET /api/v1/defaults
#[tracing::instrument(name = "http.list_defaults", skip(state))]
pub async fn list_defaults(State(state): State<AppState>) -> Result<Json<DefaultsListResponse>> {
    let defaults = state.defaults.list().await?;
    let total = defaults.len();
    Ok(Json(DefaultsListResponse { defaults, total }))
}

/// GET /api/v1/defaults/{key}
#[tracing::instrument(name = "http.get_default", skip(state))]
pub async fn get_default(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DefaultValue>> {
    validate_key(&key)?;

    state
        .defaults
        .list()
        .await?
        .into_iter()
        .find(|d| d.key == key)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Default value not found: {}", key)))
}

/// PUT /api/v1/defaults/{key} - Create or replace a default value
#[tracing::instrument(name = "http.put_default", skip(state, request))]
pub async fn put_default(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<PutDefaultRequest>,
) -> Result<Json<DefaultValue>> {
    validate_key(&key)?;

    let mut value = DefaultValue::new(key, request.value);
    value.description = request.description;

    let stored = state.defaults.upsert(value).await?;
    tracing::info!(key = %stored.key, backend = state.defaults.backend_type(), "Default value saved");
    Ok(Json(stored))
}

/// DELETE /api/v1/defaults/{key}
#[tracing::instrument(name = "http.delete_default", skip(state))]
pub async fn delete_default(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    state.defaults.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
