use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Exponential backoff for transport-level failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// A policy that runs the operation exactly once.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based), capped at `max_backoff`.
    pub fn backoff_for(&self, retry: usize) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1) as u32).unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }

    /// Run `call` until it succeeds or `max_retries` extra attempts are spent.
    /// The last error is returned unchanged.
    pub async fn retry<F, Fut, T, E>(&self, call_name: &str, mut call: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retries = 0;
        loop {
            let err = match call().await {
                Ok(value) => {
                    if retries > 0 {
                        info!(call = call_name, retries, "Model provider recovered");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if retries == self.max_retries {
                warn!(call = call_name, retries, error = %err, "Model provider unavailable, giving up");
                return Err(err);
            }
            retries += 1;

            let delay = self.backoff_for(retries);
            warn!(
                call = call_name,
                retry = retries,
                of = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Model provider call failed"
            );
            sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, 500, 5000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(3, 1, 2);

        let result: Result<&str, String> = policy
            .retry("flaky", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("connection reset".to_string())
                } else {
                    Ok("ok")
                }
            })
            .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(1, 1, 1);

        let result: Result<(), String> = policy
            .retry("down", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("refused".to_string())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(4000));
        assert_eq!(policy.backoff_for(5), Duration::from_millis(5000));
        assert_eq!(policy.backoff_for(64), Duration::from_millis(5000));
    }
}
