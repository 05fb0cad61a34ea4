//! E-mail template system.
//!
//! This module provides:
//! - `{{key}}` placeholder scanning shared with the translation wrapper
//! - The variable substitution engine (context, system keys, admin defaults)
//! - In-memory template storage with CRUD operations
//! - A renderer that prefers fresh stored translations
//!
//! # Example
//!
//! ```ignore
//! let substituter = Substituter::new(SystemValues::from(&settings.app), defaults);
//!
//! let ctx = SubstitutionContext::new()
//!     .with_user(UserData { full_name: Some("Ada".into()), ..Default::default() })
//!     .with_lesson(LessonData { lesson_title: Some("Intro to Phishing".into()), ..Default::default() });
//!
//! let text = substituter
//!     .substitute("Hi {{user_name}}, your lesson {{lesson_title}} is ready", &ctx)
//!     .await;
//! ```

mod context;
mod placeholder;
mod renderer;
mod store;
mod substitution;
mod types;
mod variables;

pub use context::{
    CompletionData, LessonData, NextLessonData, OrganizationData, SubstitutionContext, TrackData,
    UserData,
};
pub use placeholder::{
    extract_placeholders, has_placeholders, placeholder_keys, replace_placeholders, Placeholder,
    PLACEHOLDER_PATTERN,
};
pub use renderer::TemplateRenderer;
pub use store::{create_template_store, TemplateStore};
pub use substitution::{validate_placeholders, Clock, Substituter, ValidationResult};
pub use types::{
    is_valid_language, CreateTemplateRequest, RenderedEmail, Template, TemplateError,
    TemplateListResponse, TemplateResult, UpdateTemplateRequest,
};
pub use variables::{
    is_builtin, resolve_context_key, SystemValues, VariableInfo, VariableSource,
    BUILTIN_VARIABLES,
};
