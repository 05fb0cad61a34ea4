//! Circuit breaker guarding calls to upstream dependencies
//! (translation provider, PostgreSQL).

use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU8, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Milliseconds since the Unix epoch.
pub fn current_time_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BreakerState {
    /// Calls go through
    Closed = 0,
    /// Calls are rejected without reaching the upstream
    Open = 1,
    /// A limited number of trial calls are let through
    HalfOpen = 2,
}

impl From<u8> for BreakerState {
    fn from(value: u8) -> Self {
        match value {
            1 => BreakerState::Open,
            2 => BreakerState::HalfOpen,
            _ => BreakerState::Closed,
        }
    }
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// Successful trial calls needed to close it again
    pub success_threshold: u32,
    /// How long the breaker stays open before probing
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

/// Lock-free circuit breaker.
///
/// `name` only appears in log lines so operators can tell which upstream
/// tripped.
pub struct CircuitBreaker {
    name: &'static str,
    state: AtomicU8,
    failures: AtomicU32,
    successes: AtomicU32,
    changed_at_ms: AtomicI64,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(name: &'static str) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    pub fn with_config(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            state: AtomicU8::new(BreakerState::Closed as u8),
            failures: AtomicU32::new(0),
            successes: AtomicU32::new(0),
            changed_at_ms: AtomicI64::new(current_time_ms()),
            config,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current state, moving Open -> HalfOpen once the reset timeout has passed.
    pub fn state(&self) -> BreakerState {
        self.maybe_half_open();
        self.raw_state()
    }

    pub fn allow_request(&self) -> bool {
        self.state() != BreakerState::Open
    }

    pub fn record_success(&self) {
        match self.raw_state() {
            BreakerState::Closed => self.failures.store(0, Ordering::Release),
            BreakerState::HalfOpen => {
                let successes = self.successes.fetch_add(1, Ordering::AcqRel) + 1;
                if successes >= self.config.success_threshold {
                    self.transition(BreakerState::Closed);
                    tracing::info!(upstream = self.name, "Circuit breaker closed");
                }
            }
            BreakerState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        match self.raw_state() {
            BreakerState::Closed => {
                let failures = self.failures.fetch_add(1, Ordering::AcqRel) + 1;
                if failures >= self.config.failure_threshold {
                    self.transition(BreakerState::Open);
                    tracing::warn!(
                        upstream = self.name,
                        failures = failures,
                        "Circuit breaker opened"
                    );
                }
            }
            BreakerState::HalfOpen => {
                self.transition(BreakerState::Open);
                tracing::warn!(upstream = self.name, "Trial call failed, circuit breaker reopened");
            }
            BreakerState::Open => {
                self.changed_at_ms.store(current_time_ms(), Ordering::Release);
            }
        }
    }

    pub fn stats(&self) -> CircuitBreakerStats {
        CircuitBreakerStats {
            state: self.state(),
            failure_count: self.failures.load(Ordering::Acquire),
            success_count: self.successes.load(Ordering::Acquire),
        }
    }

    fn raw_state(&self) -> BreakerState {
        BreakerState::from(self.state.load(Ordering::Acquire))
    }

    fn maybe_half_open(&self) {
        if self.raw_state() != BreakerState::Open {
            return;
        }

        let elapsed = current_time_ms() - self.changed_at_ms.load(Ordering::Acquire);
        if elapsed < self.config.reset_timeout.as_millis() as i64 {
            return;
        }

        if self
            .state
            .compare_exchange(
                BreakerState::Open as u8,
                BreakerState::HalfOpen as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            self.successes.store(0, Ordering::Release);
            self.changed_at_ms.store(current_time_ms(), Ordering::Release);
            tracing::info!(upstream = self.name, "Circuit breaker half-open, probing");
        }
    }

    fn transition(&self, to: BreakerState) {
        self.state.store(to as u8, Ordering::Release);
        self.changed_at_ms.store(current_time_ms(), Ordering::Release);
        self.successes.store(0, Ordering::Release);
        if to == BreakerState::Closed {
            self.failures.store(0, Ordering::Release);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerStats {
    pub state: BreakerState,
    pub failure_count: u32,
    pub success_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config(failure_threshold: u32) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold,
            success_threshold: 2,
            reset_timeout: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_starts_closed() {
        let cb = CircuitBreaker::new("test");
        assert_eq!(cb.state(), BreakerState::Closed);
        assert!(cb.allow_request());
    }

    #[test]
    fn test_opens_after_threshold() {
        let cb = CircuitBreaker::with_config("test", fast_config(3));
        cb.record_failure();
        cb.record_failure();
        assert!(cb.allow_request());

        cb.record_failure();
        assert_eq!(cb.raw_state(), BreakerState::Open);
        assert!(!cb.allow_request());
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let cb = CircuitBreaker::with_config("test", fast_config(2));
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn test_half_open_then_closed() {
        let cb = CircuitBreaker::with_config("test", fast_config(1));
        cb.record_failure();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cb.state(), BreakerState::HalfOpen);

        cb.record_success();
        assert_eq!(cb.state(), BreakerState::HalfOpen);
        cb.record_success();
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn test_trial_failure_reopens() {
        let cb = CircuitBreaker::with_config("test", fast_config(1));
        cb.record_failure();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cb.state(), BreakerState::HalfOpen);

        cb.record_failure();
        assert_eq!(cb.raw_state(), BreakerState::Open);
    }
}
