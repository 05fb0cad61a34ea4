use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::defaults::DefaultValueBackend;
use crate::postgres::PostgresPool;
use crate::resilience::CircuitBreaker;
use crate::template::{
    create_template_store, Substituter, SystemValues, TemplateRenderer, TemplateStore,
};
use crate::translation::{
    create_translation_store, Tokenizer, TokenizerError, TranslationService, TranslationStore,
    Translator,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub start_time: Instant,
    pub template_store: Arc<TemplateStore>,
    pub defaults: Arc<dyn DefaultValueBackend>,
    pub substituter: Arc<Substituter>,
    pub renderer: Arc<TemplateRenderer>,
    pub translations: Arc<TranslationService>,
    /// Breaker of the HTTP translator, reported by /health and /metrics
    pub translator_breaker: Option<Arc<CircuitBreaker>>,
    pub postgres_pool: Option<Arc<PostgresPool>>,
}

impl AppState {
    /// Wire up the stores and services. Fails only if the configured token
    /// prefix is unusable.
    pub fn new(
        settings: Settings,
        defaults: Arc<dyn DefaultValueBackend>,
        translator: Arc<dyn Translator>,
    ) -> Result<Self, TokenizerError> {
        let tokenizer = Tokenizer::new(&settings.translation.token_prefix)?;

        let template_store = create_template_store();
        let translation_store: Arc<TranslationStore> = create_translation_store();
        let substituter = Arc::new(Substituter::new(
            SystemValues::from(&settings.app),
            defaults.clone(),
        ));
        let renderer = Arc::new(TemplateRenderer::new(
            template_store.clone(),
            translation_store.clone(),
            substituter.clone(),
        ));
        let translations = Arc::new(TranslationService::new(
            translator,
            tokenizer,
            translation_store,
        ));

        Ok(Self {
            settings: Arc::new(settings),
            start_time: Instant::now(),
            template_store,
            defaults,
            substituter,
            renderer,
            translations,
            translator_breaker: None,
            postgres_pool: None,
        })
    }

    pub fn with_translator_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.translator_breaker = Some(breaker);
        self
    }

    pub fn with_postgres(mut self, pool: Arc<PostgresPool>) -> Self {
        self.postgres_pool = Some(pool);
        self
    }
}
