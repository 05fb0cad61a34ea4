use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::defaults::DefaultsError;
use crate::template::TemplateError;
use crate::translation::{TranslationError, TranslatorError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(_) => AppError::NotFound(err.to_string()),
            TemplateError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            TemplateError::InvalidId(_) | TemplateError::InvalidTemplate(_) => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

impl From<DefaultsError> for AppError {
    fn from(err: DefaultsError) -> Self {
        match err {
            DefaultsError::InvalidKey(_) => AppError::Validation(err.to_string()),
            DefaultsError::NotFound(_) => AppError::NotFound(err.to_string()),
            DefaultsError::Unavailable(_) => AppError::Unavailable(err.to_string()),
            DefaultsError::Postgres(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<TranslationError> for AppError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::Provider(TranslatorError::Unavailable(_))
            | TranslationError::Provider(TranslatorError::NotConfigured) => {
                AppError::Unavailable(err.to_string())
            }
            TranslationError::Provider(_) | TranslationError::PlaceholderMismatch(_) => {
                AppError::Upstream(err.to_string())
            }
            TranslationError::Tokenizer(_) | TranslationError::DuplicateNodeId(_) => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

/// Hide `detail` from clients in production; it is still logged.
fn masked(detail: &str, public: &str) -> String {
    if is_production() {
        public.to_string()
    } else {
        detail.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = match &self {
            AppError::Config(e) => {
                let log_msg = e.to_string();
                let client_msg = masked(&log_msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", client_msg, log_msg)
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), msg.clone()),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), msg.clone()),
            AppError::Upstream(msg) => {
                let client_msg = masked(msg, "Translation provider error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", client_msg, msg.clone())
            }
            AppError::Unavailable(msg) => {
                let client_msg = masked(msg, "Service temporarily unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    client_msg,
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                let client_msg = masked(e, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", client_msg, e.clone())
            }
        };

        // Always log the detailed error server-side
        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::debug!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
