//! Renders stored templates for one recipient, in the requested language
//! when a fresh translation exists.

use std::sync::Arc;

use crate::translation::{normalize_language, template_resource_id, TranslationStore};

use super::context::SubstitutionContext;
use super::store::TemplateStore;
use super::substitution::Substituter;
use super::types::{RenderedEmail, Template, TemplateResult};

pub struct TemplateRenderer {
    templates: Arc<TemplateStore>,
    translations: Arc<TranslationStore>,
    substituter: Arc<Substituter>,
}

impl TemplateRenderer {
    pub fn new(
        templates: Arc<TemplateStore>,
        translations: Arc<TranslationStore>,
        substituter: Arc<Substituter>,
    ) -> Self {
        Self {
            templates,
            translations,
            substituter,
        }
    }

    /// Render template `id`. With a `language` other than the template's own,
    /// the stored translation is used when both subject and body are fresh;
    /// otherwise the source text is rendered.
    pub async fn render(
        &self,
        id: &str,
        ctx: &SubstitutionContext,
        language: Option<&str>,
    ) -> TemplateResult<RenderedEmail> {
        let template = self.templates.get(id)?;
        let (language, subject, body) = self.select_text(&template, language);

        let subject = self.substituter.substitute(&subject, ctx).await;
        let body = self.substituter.substitute(&body, ctx).await;

        Ok(RenderedEmail {
            template_id: template.id,
            category: template.category,
            language,
            subject,
            body,
        })
    }

    fn select_text(&self, template: &Template, requested: Option<&str>) -> (String, String, String) {
        let source = || {
            (
                template.language.clone(),
                template.subject.clone(),
                template.body.clone(),
            )
        };

        let Some(requested) = requested.map(normalize_language) else {
            return source();
        };
        if requested == normalize_language(&template.language) {
            return source();
        }

        let resource_id = template_resource_id(&template.id);
        let subject = self
            .translations
            .fresh(&resource_id, &requested, "subject", &template.subject);
        let body = self
            .translations
            .fresh(&resource_id, &requested, "body", &template.body);

        match (subject, body) {
            (Some(subject), Some(body)) => (requested, subject, body),
            _ => {
                tracing::debug!(
                    template_id = %template.id,
                    language = %requested,
                    "No fresh translation, rendering source text"
                );
                source()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::MemoryDefaultsBackend;
    use crate::template::{CreateTemplateRequest, SystemValues, UserData};
    use crate::translation::{content_hash, StoredTranslation};

    fn setup() -> (TemplateRenderer, Arc<TemplateStore>, Arc<TranslationStore>) {
        let templates = Arc::new(TemplateStore::new());
        let translations = Arc::new(TranslationStore::new());
        let substituter = Arc::new(Substituter::new(
            SystemValues::default(),
            Arc::new(MemoryDefaultsBackend::new()),
        ));

        templates
            .create(Template::from(CreateTemplateRequest {
                id: "welcome".to_string(),
                name: "Welcome".to_string(),
                category: "invite".to_string(),
                subject: "Welcome {{user_first_name}}".to_string(),
                body: "Hi {{user_name}}".to_string(),
                language: "en".to_string(),
                description: None,
            }))
            .unwrap();

        let renderer = TemplateRenderer::new(templates.clone(), translations.clone(), substituter);
        (renderer, templates, translations)
    }

    fn ctx() -> SubstitutionContext {
        SubstitutionContext::new().with_user(UserData {
            full_name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        })
    }

    fn store_german(translations: &TranslationStore, subject_source: &str) {
        translations.put(StoredTranslation::new(
            "template:welcome",
            "de",
            "subject",
            content_hash(subject_source),
            "Willkommen {{user_first_name}}",
        ));
        translations.put(StoredTranslation::new(
            "template:welcome",
            "de",
            "body",
            content_hash("Hi {{user_name}}"),
            "Hallo {{user_name}}",
        ));
    }

    #[tokio::test]
    async fn test_render_source_language() {
        let (renderer, _, _) = setup();
        let rendered = renderer.render("welcome", &ctx(), None).await.unwrap();

        assert_eq!(rendered.language, "en");
        assert_eq!(rendered.subject, "Welcome Ada");
        assert_eq!(rendered.body, "Hi Ada Lovelace");
    }

    #[tokio::test]
    async fn test_render_fresh_translation() {
        let (renderer, _, translations) = setup();
        store_german(&translations, "Welcome {{user_first_name}}");

        let rendered = renderer.render("welcome", &ctx(), Some("DE")).await.unwrap();
        assert_eq!(rendered.language, "de");
        assert_eq!(rendered.subject, "Willkommen Ada");
        assert_eq!(rendered.body, "Hallo Ada Lovelace");
    }

    #[tokio::test]
    async fn test_render_stale_translation_falls_back() {
        let (renderer, _, translations) = setup();
        store_german(&translations, "an older subject");

        let rendered = renderer.render("welcome", &ctx(), Some("de")).await.unwrap();
        assert_eq!(rendered.language, "en");
        assert_eq!(rendered.subject, "Welcome Ada");
    }

    #[tokio::test]
    async fn test_render_missing_template() {
        let (renderer, _, _) = setup();
        assert!(renderer.render("nope", &ctx(), None).await.is_err());
    }
}
