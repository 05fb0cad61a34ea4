use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;

use lesson_mailer::config::Settings;
use lesson_mailer::defaults::{create_defaults_backend, PostgresDefaultsBackend};
use lesson_mailer::postgres::PostgresPool;
use lesson_mailer::resilience::CircuitBreaker;
use lesson_mailer::server::{create_app, AppState};
use lesson_mailer::telemetry::init_telemetry;
use lesson_mailer::translation::HttpTranslator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;

    // Initialize tracing; the guard flushes spans on exit
    let _telemetry = init_telemetry(&settings.otel, settings.server.json_logs)?;
    tracing::info!("Configuration loaded");

    // PostgreSQL is only needed for the postgres defaults backend
    let postgres_pool = connect_postgres(&settings).await;

    let defaults = create_defaults_backend(&settings.defaults, postgres_pool.clone());

    let translator = Arc::new(HttpTranslator::new(&settings.translation)?);
    let translator_breaker = translator.breaker();

    let mut state = AppState::new(settings.clone(), defaults, translator)?
        .with_translator_breaker(translator_breaker);
    if let Some(pool) = postgres_pool.clone() {
        state = state.with_postgres(pool);
    }
    tracing::info!("Application state initialized");

    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    if let Some(pool) = postgres_pool {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Connect when `defaults.backend = "postgres"` and a URL is configured.
/// Connection failures are logged; the factory then falls back to memory.
async fn connect_postgres(settings: &Settings) -> Option<Arc<PostgresPool>> {
    if settings.defaults.backend != "postgres" {
        return None;
    }

    if settings.database.url.is_none() {
        tracing::warn!("defaults.backend is postgres but database.url is not set");
        return None;
    }

    let breaker = Arc::new(CircuitBreaker::new("postgres"));
    let pool = match PostgresPool::connect(&settings.database, breaker).await {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            return None;
        }
    };

    if let Err(e) = PostgresDefaultsBackend::new(pool.clone()).ensure_schema().await {
        tracing::error!(error = %e, "Failed to prepare variable_defaults table");
        return None;
    }

    Some(pool)
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
