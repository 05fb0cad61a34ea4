//! Variable substitution engine for templates.
//!
//! Resolution order for each distinct key:
//! 1. structured context data ([`resolve_context_key`])
//! 2. system keys (dates, well-known URLs)
//! 3. admin-defined defaults, fetched in one batch for the keys still open
//!
//! Unresolved placeholders stay in the output verbatim. A failing default
//! store never reaches the caller: the original template is returned instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::defaults::{DefaultValueBackend, DefaultsError};
use crate::metrics::{DefaultsMetrics, SubstitutionMetrics};

use super::context::SubstitutionContext;
use super::placeholder::{placeholder_keys, replace_placeholders};
use super::variables::{is_builtin, resolve_context_key, SystemValues};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Outcome of checking a template's placeholders against known keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Unknown keys, deduplicated, in order of first appearance
    pub unknown_keys: Vec<String>,
}

impl ValidationResult {
    fn from_unknown(unknown_keys: Vec<String>) -> Self {
        Self {
            valid: unknown_keys.is_empty(),
            unknown_keys,
        }
    }
}

/// Check every placeholder key against `is_known`.
pub fn validate_placeholders<F>(template: &str, is_known: F) -> ValidationResult
where
    F: Fn(&str) -> bool,
{
    let unknown = placeholder_keys(template)
        .into_iter()
        .filter(|key| !is_known(key))
        .collect();
    ValidationResult::from_unknown(unknown)
}

pub struct Substituter {
    system: SystemValues,
    defaults: Arc<dyn DefaultValueBackend>,
    clock: Clock,
}

impl Substituter {
    pub fn new(system: SystemValues, defaults: Arc<dyn DefaultValueBackend>) -> Self {
        Self {
            system,
            defaults,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for `{{current_date}}` and friends.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn defaults(&self) -> &Arc<dyn DefaultValueBackend> {
        &self.defaults
    }

    /// Render `template` against `ctx`. Never fails.
    pub async fn substitute(&self, template: &str, ctx: &SubstitutionContext) -> String {
        match self.try_substitute(template, ctx).await {
            Ok(rendered) => rendered,
            Err(e) => {
                SubstitutionMetrics::record_fallback();
                tracing::warn!(
                    error = %e,
                    backend = self.defaults.backend_type(),
                    "Default value lookup failed, returning template unchanged"
                );
                template.to_string()
            }
        }
    }

    async fn try_substitute(
        &self,
        template: &str,
        ctx: &SubstitutionContext,
    ) -> Result<String, DefaultsError> {
        let keys = placeholder_keys(template);
        if keys.is_empty() {
            SubstitutionMetrics::record_passthrough();
            return Ok(template.to_string());
        }

        let now = (self.clock)();
        let mut values: HashMap<String, String> = HashMap::with_capacity(keys.len());
        let mut pending = Vec::new();

        for key in keys.iter() {
            let resolved = resolve_context_key(key, ctx, self.system.date_format())
                .or_else(|| self.system.resolve(key, now));
            match resolved {
                Some(value) => {
                    values.insert(key.clone(), value);
                }
                None => pending.push(key.clone()),
            }
        }

        if !pending.is_empty() {
            let defaults = self.defaults.get_many(&pending).await.inspect_err(|_| {
                DefaultsMetrics::record_error();
            })?;
            DefaultsMetrics::record_lookup(pending.len(), defaults.len());
            values.extend(defaults);
        }

        let unresolved = keys.iter().filter(|k| !values.contains_key(*k)).count();
        if unresolved > 0 {
            tracing::debug!(unresolved = unresolved, "Placeholders left unresolved");
        }
        SubstitutionMetrics::record_rendered(unresolved);

        Ok(replace_placeholders(template, |key| values.get(key).cloned()))
    }

    /// Report placeholder keys that nothing would resolve.
    ///
    /// Built-in keys are always known; other keys are known when the default
    /// store has a value for them. If the store fails, only built-ins count.
    pub async fn validate(&self, template: &str) -> ValidationResult {
        let candidates: Vec<String> = placeholder_keys(template)
            .into_iter()
            .filter(|key| !is_builtin(key))
            .collect();

        if candidates.is_empty() {
            return ValidationResult::from_unknown(Vec::new());
        }

        let defaults = match self.defaults.get_many(&candidates).await {
            Ok(found) => found,
            Err(e) => {
                DefaultsMetrics::record_error();
                tracing::warn!(error = %e, "Default value lookup failed during validation");
                HashMap::new()
            }
        };

        validate_placeholders(template, |key| is_builtin(key) || defaults.contains_key(key))
    }
}
