//! Admin-defined default values for template placeholders.
//!
//! A default is consulted only when neither the substitution context nor the
//! system keys resolve a placeholder.

mod backend;
mod factory;
mod memory_backend;
mod postgres_backend;

pub use backend::{validate_key, DefaultValue, DefaultValueBackend, DefaultsError};
pub use factory::create_defaults_backend;
pub use memory_backend::MemoryDefaultsBackend;
pub use postgres_backend::PostgresDefaultsBackend;
