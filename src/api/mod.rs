//! API layer - HTTP endpoint handlers organized by domain.

mod defaults;
mod health;
mod metrics;
mod render;
mod routes;
mod template;
mod translation;

pub use defaults::{delete_default, get_default, list_defaults, put_default, DefaultsListResponse};
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use render::{list_variables, render, validate, RenderRequest, RenderResponse};
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, get_template, get_template_translation, list_templates,
    render_template, translate_template, update_template, TemplateTranslationResponse,
};
pub use translation::{translate, translate_lesson, TranslateLessonRequest, TranslateRequest};
