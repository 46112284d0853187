//! Tunable generation settings, read from the environment.

use std::time::Duration;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Retry, timeout, and token budget configuration.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Retries after the first attempt, for non-fast requests.
    pub max_retries: u32,
    /// Base backoff delay; doubles per attempt.
    pub retry_base_delay: Duration,
    /// Per-request timeout for normal generation.
    pub generation_timeout: Duration,
    /// Tighter timeout cap for fast mode.
    pub fast_timeout: Duration,
    /// Token budget cap applied in fast mode.
    pub fast_max_tokens: u32,
    /// Consecutive failures before the circuit opens.
    pub circuit_failure_threshold: u32,
    /// How long an open circuit rejects calls.
    pub circuit_cool_off: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_base_delay: Duration::from_millis(1000),
            generation_timeout: Duration::from_secs(60),
            fast_timeout: Duration::from_secs(30),
            fast_max_tokens: 650,
            circuit_failure_threshold: 3,
            circuit_cool_off: Duration::from_secs(30),
        }
    }
}

impl GenerationSettings {
    /// Load settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_u64("MAX_RETRIES", defaults.max_retries as u64) as u32,
            retry_base_delay: Duration::from_millis(env_u64(
                "RETRY_BASE_DELAY_MS",
                defaults.retry_base_delay.as_millis() as u64,
            )),
            generation_timeout: Duration::from_secs(env_u64(
                "GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout.as_secs(),
            )),
            fast_timeout: Duration::from_secs(env_u64(
                "FAST_TIMEOUT_SECS",
                defaults.fast_timeout.as_secs(),
            )),
            fast_max_tokens: env_u64("FAST_MAX_TOKENS", defaults.fast_max_tokens as u64) as u32,
            circuit_failure_threshold: env_u64(
                "CIRCUIT_FAILURE_THRESHOLD",
                defaults.circuit_failure_threshold as u64,
            ) as u32,
            circuit_cool_off: Duration::from_secs(env_u64(
                "CIRCUIT_COOL_OFF_SECS",
                defaults.circuit_cool_off.as_secs(),
            )),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
