mod settings;

pub use settings::{
    ApiConfig, AppConfig, DatabaseConfig, DefaultsConfig, OtelConfig, ServerConfig, Settings,
    TranslationConfig,
};
