//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::resilience::{BreakerState, CircuitBreakerStats};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: usize,
    pub stored_translations: usize,
    pub defaults: DefaultsHealthResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<CircuitBreakerStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresHealthResponse>,
}

#[derive(Debug, Serialize)]
pub struct DefaultsHealthResponse {
    pub backend: String,
}

#[derive(Debug, Serialize)]
pub struct PostgresHealthResponse {
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: u32,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let translator = state.translator_breaker.as_ref().map(|b| b.stats());

    let postgres = state.postgres_pool.as_ref().map(|pool| {
        let inner_pool = pool.pool();
        PostgresHealthResponse {
            connected: pool.is_available(),
            pool_size: inner_pool.size(),
            idle_connections: inner_pool.num_idle() as u32,
        }
    });

    let translator_open = translator
        .as_ref()
        .is_some_and(|stats| stats.state == BreakerState::Open);
    let postgres_down = postgres.as_ref().is_some_and(|pg| !pg.connected);
    let status = if translator_open || postgres_down {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        templates: state.template_store.count(),
        stored_translations: state.translations.store().count(),
        defaults: DefaultsHealthResponse {
            backend: state.defaults.backend_type().to_string(),
        },
        translator,
        postgres,
    })
}
