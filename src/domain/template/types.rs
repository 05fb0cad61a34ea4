//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// An e-mail notification template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Notification category, e.g. `lesson_reminder` or `invite`
    pub category: String,

    /// Subject line with {{variable}} placeholders
    pub subject: String,

    /// HTML or plain-text body with {{variable}} placeholders
    pub body: String,

    /// Language the subject and body are written in
    #[serde(default = "default_language")]
    pub language: String,

    /// Template description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_language() -> String {
    "en".to_string()
}

/// Language codes such as `en`, `de`, `pt-BR`.
pub fn is_valid_language(code: &str) -> bool {
    (2..=10).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl Template {
    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidId(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplateError::InvalidId(
                "ID must contain only alphanumeric, dash, or underscore".to_string(),
            ));
        }

        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        if self.category.is_empty() || self.category.len() > 128 {
            return Err(TemplateError::InvalidTemplate(
                "Category must be 1-128 characters".to_string(),
            ));
        }

        if self.subject.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate(
                "Subject must not be empty".to_string(),
            ));
        }

        if !is_valid_language(&self.language) {
            return Err(TemplateError::InvalidTemplate(format!(
                "Invalid language code: {}",
                self.language
            )));
        }

        Ok(())
    }
}

/// Request to create a new template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Source language (optional, defaults to `en`)
    #[serde(default = "default_language")]
    pub language: String,
    pub description: Option<String>,
}

impl From<CreateTemplateRequest> for Template {
    fn from(req: CreateTemplateRequest) -> Self {
        let now = Utc::now();
        Template {
            id: req.id,
            name: req.name,
            category: req.category,
            subject: req.subject,
            body: req.body,
            language: req.language,
            description: req.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update an existing template
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub language: Option<String>,
    /// Template description (optional, use null to clear)
    pub description: Option<Option<String>>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
    pub total: usize,
}

/// A template rendered for one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub template_id: String,
    pub category: String,
    /// Language of the text actually used
    pub language: String,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str) -> Template {
        Template::from(CreateTemplateRequest {
            id: id.to_string(),
            name: "Lesson Reminder".to_string(),
            category: "lesson_reminder".to_string(),
            subject: "Reminder: {{lesson_title}}".to_string(),
            body: "Hi {{user_first_name}}".to_string(),
            language: "en".to_string(),
            description: None,
        })
    }

    #[test]
    fn test_template_validation_valid() {
        assert!(template("lesson-reminder").validate().is_ok());
    }

    #[test]
    fn test_template_validation_empty_id() {
        assert!(matches!(
            template("").validate(),
            Err(TemplateError::InvalidId(_))
        ));
    }

    #[test]
    fn test_template_validation_invalid_id_chars() {
        assert!(matches!(
            template("invalid/id").validate(),
            Err(TemplateError::InvalidId(_))
        ));
    }

    #[test]
    fn test_template_validation_blank_subject() {
        let mut t = template("blank");
        t.subject = "   ".to_string();
        assert!(matches!(
            t.validate(),
            Err(TemplateError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_language_codes() {
        assert!(is_valid_language("en"));
        assert!(is_valid_language("pt-BR"));
        assert!(!is_valid_language("e"));
        assert!(!is_valid_language("en_US"));
    }
}
