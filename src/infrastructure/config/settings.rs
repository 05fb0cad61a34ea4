use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub json_logs: bool,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

/// Values used to build system placeholders (`{{login_url}}`, `{{current_date}}`, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Public origin of the learning platform, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// chrono format string for `{{current_date}}`
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// chrono format string for `{{current_time}}`
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// DeepL-compatible translate endpoint
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_translation_timeout")]
    pub timeout_seconds: u64,
    /// Prefix of the opaque tokens that stand in for placeholders
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,
    /// Consecutive failures before the provider breaker opens
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Seconds before an open breaker lets a trial request through
    #[serde(default = "default_reset_timeout")]
    pub reset_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// "memory" or "postgres"
    #[serde(default = "default_defaults_backend")]
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_date_format() -> String {
    "%B %-d, %Y".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

fn default_translation_endpoint() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_translation_timeout() -> u64 {
    30
}

fn default_token_prefix() -> String {
    "XVAR".to_string()
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_reset_timeout() -> u64 {
    30
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_idle_timeout() -> u32 {
    600 // 10 minutes
}

fn default_defaults_backend() -> String {
    "memory".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "lesson-mailer".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("app.base_url", default_base_url())?
            .set_default("translation.token_prefix", default_token_prefix())?
            .set_default("defaults.backend", "memory")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, APP__BASE_URL, TRANSLATION__API_KEY, DATABASE__URL, ...
            // Double underscore keeps snake_case field names intact.
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            json_logs: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_translation_endpoint(),
            api_key: None,
            timeout_seconds: default_translation_timeout(),
            token_prefix: default_token_prefix(),
            failure_threshold: default_failure_threshold(),
            reset_timeout_seconds: default_reset_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            backend: default_defaults_backend(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
