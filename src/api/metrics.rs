//! Prometheus metrics endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::metrics;
use crate::server::AppState;

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    update_metrics_from_state(&state);

    match metrics::encode_metrics() {
        Ok(output) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode Prometheus metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(axum::http::header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Refresh gauges that are read from state rather than updated in place
fn update_metrics_from_state(state: &AppState) {
    metrics::TEMPLATES_TOTAL.set(state.template_store.count() as i64);
    metrics::STORED_TRANSLATIONS_TOTAL.set(state.translations.store().count() as i64);

    if let Some(breaker) = &state.translator_breaker {
        metrics::TRANSLATOR_BREAKER_STATE.set(breaker.state() as i64);
    }
}
