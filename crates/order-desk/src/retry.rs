//! Bounded exponential backoff for transient store failures.

use crate::order_actor::OrderError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Upper bound for a single backoff sleep.
const BACKOFF_MAX: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never less than one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(50))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Runs the operation once, with no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Sleep before retry number `attempt` (1-based): base, 2x base, 4x base, capped.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(BACKOFF_MAX)
    }

    /// Runs `op` until it succeeds, fails with a non-transient error, or attempts run out.
    ///
    /// Only `StoreUnavailable` is retried. The last error is returned as is.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, OrderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OrderError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Err(OrderError::StoreUnavailable(reason)) if attempt < self.max_attempts => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(attempt, ?delay, %reason, "Store unavailable, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::new(10, Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(40), BACKOFF_MAX);
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = policy
            .run(|| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(OrderError::StoreUnavailable("timeout".into()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result: Result<(), _> = policy
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OrderError::StoreUnavailable("closed".into()))
            })
            .await;

        assert!(matches!(result, Err(OrderError::StoreUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_validation_errors() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::default()
            .run(|| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OrderError::InvalidOrder("no items".into()))
            })
            .await;

        assert!(matches!(result, Err(OrderError::InvalidOrder(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
