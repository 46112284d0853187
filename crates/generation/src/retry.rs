//! Retry executor with exponential backoff.

use std::future::Future;
use std::time::Duration;

use provider_core::ProviderError;
use tracing::warn;

use crate::error::{GenerationError, Result};

/// A successful call plus how many attempts it took.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub value: T,
    /// Zero-based index of the attempt that succeeded.
    pub attempts: u32,
}

/// Run `operation` up to `max_retries + 1` times.
///
/// Retriable errors (rate limits, server errors, timeouts, network failures)
/// back off `base_delay * 2^attempt` between attempts. Non-retriable errors
/// propagate immediately without consuming retries. When all attempts fail,
/// the last error is wrapped in [`GenerationError::Api`].
pub async fn with_retry<T, F, Fut>(
    provider: &str,
    max_retries: u32,
    base_delay: Duration,
    mut operation: F,
) -> Result<RetryOutcome<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, ProviderError>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation(attempt).await {
            Ok(value) => {
                return Ok(RetryOutcome {
                    value,
                    attempts: attempt,
                })
            }
            Err(err) if err.is_retriable() => {
                warn!(
                    provider,
                    attempt = attempt + 1,
                    total = max_retries + 1,
                    error = %err,
                    "provider call failed"
                );
                last_error = Some(err);
                if attempt < max_retries {
                    tokio::time::sleep(base_delay * 2u32.pow(attempt)).await;
                }
            }
            Err(err) => return Err(GenerationError::Provider(err)),
        }
    }

    // max_retries >= 0 guarantees at least one iteration ran.
    let last_error = last_error.unwrap_or_else(|| ProviderError::Network("no attempts".into()));
    Err(GenerationError::Api {
        provider: provider.to_string(),
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn retriable() -> ProviderError {
        ProviderError::Server {
            status: 500,
            message: "overloaded".into(),
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);

        let outcome = with_retry("mock", 2, Duration::from_millis(1), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(retriable())
                } else {
                    Ok("done")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome.value, "done");
        assert_eq!(outcome.attempts, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_wraps_last_error() {
        let calls = AtomicU32::new(0);

        let err = with_retry::<(), _, _>("anthropic", 2, Duration::from_millis(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(retriable()) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            err,
            GenerationError::Api { provider, last_error: ProviderError::Server { .. } }
                if provider == "anthropic"
        ));
    }

    #[tokio::test]
    async fn test_non_retriable_fails_immediately() {
        let calls = AtomicU32::new(0);

        let err = with_retry::<(), _, _>("mock", 2, Duration::from_millis(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::Auth("bad key".into())) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            err,
            GenerationError::Provider(ProviderError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_retries_single_attempt() {
        let calls = AtomicU32::new(0);

        let err = with_retry::<(), _, _>("mock", 0, Duration::from_millis(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(retriable()) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, GenerationError::Api { .. }));
    }
}
