//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    DEFAULTS_LOOKUPS_TOTAL, PLACEHOLDERS_UNRESOLVED_TOTAL, SUBSTITUTIONS_TOTAL,
    TRANSLATIONS_TOTAL, TRANSLATION_LATENCY,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording substitution metrics
pub struct SubstitutionMetrics;

impl SubstitutionMetrics {
    /// Template had no placeholders
    pub fn record_passthrough() {
        SUBSTITUTIONS_TOTAL.with_label_values(&["passthrough"]).inc();
    }

    /// Placeholders were resolved and substituted
    pub fn record_rendered(unresolved: usize) {
        SUBSTITUTIONS_TOTAL.with_label_values(&["rendered"]).inc();
        if unresolved > 0 {
            PLACEHOLDERS_UNRESOLVED_TOTAL.inc_by(unresolved as u64);
        }
    }

    /// A lookup failed and the original template was returned
    pub fn record_fallback() {
        SUBSTITUTIONS_TOTAL.with_label_values(&["fallback"]).inc();
    }
}

/// Helper struct for recording translation metrics
pub struct TranslationMetrics;

impl TranslationMetrics {
    pub fn record_success(latency: Duration) {
        TRANSLATIONS_TOTAL.with_label_values(&["ok"]).inc();
        TRANSLATION_LATENCY.observe(latency.as_secs_f64());
    }

    pub fn record_provider_error(latency: Duration) {
        TRANSLATIONS_TOTAL
            .with_label_values(&["provider_error"])
            .inc();
        TRANSLATION_LATENCY.observe(latency.as_secs_f64());
    }

    /// Breaker was open, the provider was not called
    pub fn record_unavailable() {
        TRANSLATIONS_TOTAL.with_label_values(&["unavailable"]).inc();
    }

    /// Provider output lost or duplicated a placeholder token
    pub fn record_mismatch() {
        TRANSLATIONS_TOTAL.with_label_values(&["mismatch"]).inc();
    }
}

/// Helper struct for recording default value store metrics
pub struct DefaultsMetrics;

impl DefaultsMetrics {
    pub fn record_lookup(requested: usize, found: usize) {
        DEFAULTS_LOOKUPS_TOTAL
            .with_label_values(&["hit"])
            .inc_by(found as u64);
        DEFAULTS_LOOKUPS_TOTAL
            .with_label_values(&["miss"])
            .inc_by(requested.saturating_sub(found) as u64);
    }

    pub fn record_error() {
        DEFAULTS_LOOKUPS_TOTAL.with_label_values(&["error"]).inc();
    }
}
