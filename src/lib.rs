// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;
pub use infrastructure::postgres;
pub use infrastructure::resilience;

// Domain layer (business logic)
pub mod domain;

pub use domain::defaults;
pub use domain::template;
pub use domain::translation;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod telemetry;
