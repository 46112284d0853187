//! Per-provider circuit breaker.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::{GenerationError, Result};

#[derive(Debug, Default)]
struct CircuitState {
    consecutive_failures: u32,
    open_until: Option<Instant>,
}

/// Fault isolation for provider calls.
///
/// After `threshold` consecutive failures for a provider the circuit opens
/// and calls fail fast for `cool_off`. Any success closes the circuit and
/// resets the failure count.
pub struct CircuitBreaker {
    states: Mutex<HashMap<String, CircuitState>>,
    threshold: u32,
    cool_off: Duration,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cool_off: Duration) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            threshold,
            cool_off,
        }
    }

    /// Fail fast if the circuit is open for this provider.
    pub fn check_open(&self, provider: &str) -> Result<()> {
        let states = self.states.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(state) = states.get(provider) {
            if let Some(open_until) = state.open_until {
                let now = Instant::now();
                if open_until > now {
                    let retry_after = (open_until - now).as_secs().max(1);
                    return Err(GenerationError::ProviderUnavailable {
                        provider: provider.to_string(),
                        retry_after_seconds: retry_after,
                    });
                }
            }
        }

        Ok(())
    }

    /// Record a successful call, closing the circuit immediately.
    pub fn record_success(&self, provider: &str) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(state) = states.get_mut(provider) {
            state.consecutive_failures = 0;
            state.open_until = None;
        }
    }

    /// Record a failed call; opens the circuit at the threshold.
    pub fn record_failure(&self, provider: &str) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let state = states.entry(provider.to_string()).or_default();

        state.consecutive_failures += 1;
        if state.consecutive_failures >= self.threshold {
            state.open_until = Some(Instant::now() + self.cool_off);
            warn!(
                provider,
                failures = state.consecutive_failures,
                cool_off_secs = self.cool_off.as_secs(),
                "circuit breaker opened"
            );
        }
    }

    /// Clear all recorded state.
    pub fn reset(&self) {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
