//! Prometheus metrics for the template service.
//!
//! - Substitution metrics (renders, fail-open fallbacks, unresolved placeholders)
//! - Translation metrics (provider calls, latency, placeholder mismatches)
//! - Default value store metrics
//! - Inventory gauges (templates, stored translations)

mod helpers;

pub use helpers::{encode_metrics, DefaultsMetrics, SubstitutionMetrics, TranslationMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "lesson_mailer";

lazy_static! {
    // ============================================================================
    // Substitution Metrics
    // ============================================================================

    /// Substitution passes by outcome (rendered, passthrough, fallback)
    pub static ref SUBSTITUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_substitutions_total", METRIC_PREFIX),
        "Template substitution passes by outcome",
        &["outcome"]
    ).unwrap();

    /// Placeholders left as literal text because nothing resolved them
    pub static ref PLACEHOLDERS_UNRESOLVED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_placeholders_unresolved_total", METRIC_PREFIX),
        "Placeholders that could not be resolved"
    ).unwrap();

    // ============================================================================
    // Translation Metrics
    // ============================================================================

    /// Translation calls by outcome (ok, provider_error, mismatch, unavailable)
    pub static ref TRANSLATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_translations_total", METRIC_PREFIX),
        "Translation calls by outcome",
        &["outcome"]
    ).unwrap();

    /// Latency of a single translation provider call
    pub static ref TRANSLATION_LATENCY: Histogram = register_histogram!(
        format!("{}_translation_latency_seconds", METRIC_PREFIX),
        "Translation provider latency in seconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    /// Translator circuit breaker state (0=closed, 1=open, 2=half-open)
    pub static ref TRANSLATOR_BREAKER_STATE: IntGauge = register_int_gauge!(
        format!("{}_translator_breaker_state", METRIC_PREFIX),
        "Translator circuit breaker state (0=closed, 1=open, 2=half-open)"
    ).unwrap();

    // ============================================================================
    // Default Value Store Metrics
    // ============================================================================

    /// Default value lookups by outcome (hit, miss, error)
    pub static ref DEFAULTS_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_defaults_lookups_total", METRIC_PREFIX),
        "Default value lookups by outcome",
        &["outcome"]
    ).unwrap();

    // ============================================================================
    // Inventory
    // ============================================================================

    pub static ref TEMPLATES_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_templates_total", METRIC_PREFIX),
        "Number of stored templates"
    ).unwrap();

    pub static ref STORED_TRANSLATIONS_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_stored_translations_total", METRIC_PREFIX),
        "Number of stored field translations"
    ).unwrap();
}
