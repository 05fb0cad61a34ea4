//! Template storage with CRUD operations

use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::metrics::TEMPLATES_TOTAL;

use super::types::{Template, TemplateError, TemplateResult, UpdateTemplateRequest};

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, Template>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Create a new template
    pub fn create(&self, template: Template) -> TemplateResult<Template> {
        template.validate()?;

        match self.templates.entry(template.id.clone()) {
            Entry::Occupied(_) => Err(TemplateError::AlreadyExists(template.id)),
            Entry::Vacant(slot) => {
                slot.insert(template.clone());
                TEMPLATES_TOTAL.set(self.templates.len() as i64);
                tracing::info!(template_id = %template.id, "Template created");
                Ok(template)
            }
        }
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates, ordered by ID
    pub fn list(&self) -> Vec<Template> {
        let mut templates: Vec<Template> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Apply a partial update; the stored template is untouched if the result is invalid
    pub fn update(&self, id: &str, updates: UpdateTemplateRequest) -> TemplateResult<Template> {
        let mut template = self.get(id)?;

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(category) = updates.category {
            template.category = category;
        }

        if let Some(subject) = updates.subject {
            template.subject = subject;
        }

        if let Some(body) = updates.body {
            template.body = body;
        }

        if let Some(language) = updates.language {
            template.language = language;
        }

        if let Some(description) = updates.description {
            template.description = description;
        }

        template.updated_at = Utc::now();
        template.validate()?;

        self.templates.insert(id.to_string(), template.clone());

        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        TEMPLATES_TOTAL.set(self.templates.len() as i64);
        tracing::info!(template_id = %id, "Template deleted");
        Ok(())
    }

    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new())
}
