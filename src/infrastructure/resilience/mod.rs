mod circuit_breaker;

pub use circuit_breaker::{
    current_time_ms, BreakerState, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats,
};
