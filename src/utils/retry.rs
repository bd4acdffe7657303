//! Retry with exponential backoff for upstream API calls.

use std::time::Duration;

use tokio::time::sleep;

use crate::rxiv::ApiError;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied after every retried attempt
    pub backoff_multiplier: f64,
    /// Upper bound on a single delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

/// Delay before retrying after the `attempt`-th failure (1-based).
fn delay_before(config: &RetryConfig, attempt: u32) -> Duration {
    let exp = config.initial_delay.as_secs_f64()
        * config.backoff_multiplier.powi(attempt as i32 - 1);
    Duration::from_secs_f64(exp.min(config.max_delay.as_secs_f64()))
}

/// Execute an async operation, retrying transient failures.
///
/// Only errors for which [`ApiError::is_transient`] holds (HTTP 429 and
/// 5xx) are retried; everything else is returned immediately. The backoff
/// delay doubles after every retried attempt and is local to this call: a
/// previous invocation leaves no trace on the next one.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!("operation succeeded on attempt {}", attempt);
                }
                return Ok(result);
            }
            Err(error) if error.is_transient() && attempt < config.max_attempts => {
                let delay = delay_before(&config, attempt);
                tracing::debug!(
                    "transient error on attempt {}: {}, retrying in {:?}",
                    attempt,
                    error,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                if error.is_transient() {
                    tracing::warn!("operation failed after {} attempts: {}", attempt, error);
                }
                return Err(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ApiError>("ok")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(ApiError::RateLimit)
                    } else {
                        Ok("ok")
                    }
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attempts_never_exceed_max() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::RateLimit)
                }
            })
        }
        .await;

        assert!(matches!(result, Err(ApiError::RateLimit)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::Upstream("bad interval".to_string()))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(ApiError::Upstream(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_doubles_each_attempt() {
        let config = fast_config();
        let first = delay_before(&config, 1);
        let second = delay_before(&config, 2);
        let third = delay_before(&config, 3);

        assert_eq!(first, Duration::from_millis(5));
        assert_eq!(second, first * 2);
        assert_eq!(third, second * 2);
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(120),
        };
        assert_eq!(delay_before(&config, 3), Duration::from_millis(120));
    }
}
