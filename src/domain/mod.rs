//! Domain layer modules
//!
//! This module contains business domain logic:
//! - `defaults`: Admin-defined placeholder default values
//! - `template`: E-mail templates and variable substitution
//! - `translation`: Placeholder-preserving machine translation

pub mod defaults;
pub mod template;
pub mod translation;
