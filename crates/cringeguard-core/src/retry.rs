//! Retry with exponential backoff on rate-limit failures
//!
//! Only [`Error::RateLimited`] is retried. Every other failure, including
//! timeouts and 5xx answers, propagates on the first attempt.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::warn;

/// Default total number of attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Backoff schedule for a single network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,

    /// Delay before retry `i` is `base_delay * 2^i`
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delays slept between attempts, in order.
    ///
    /// Yields `max_attempts - 1` items; a policy with 0 attempts still makes
    /// one call.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let base = self.base_delay;
        (0..self.max_attempts.saturating_sub(1)).map(move |i| base.saturating_mul(1u32 << i.min(31)))
    }

    /// Run `operation`, retrying while it fails with a rate-limit error.
    ///
    /// Exhausting every attempt returns the last rate-limit error.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0u32;
        let schedule = self.delays().inspect(move |delay| {
            retry += 1;
            warn!(retry, delay_ms = delay.as_millis() as u64, "rate limited, backing off");
        });

        RetryIf::spawn(schedule, operation, |err: &Error| err.is_rate_limited()).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[test]
    fn test_delay_schedule_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100));
        let delays: Vec<_> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
            ]
        );
    }

    #[test]
    fn test_zero_attempts_has_no_delays() {
        assert_eq!(RetryPolicy::new(0, DEFAULT_BASE_DELAY).delays().count(), 0);
        assert_eq!(RetryPolicy::new(1, DEFAULT_BASE_DELAY).delays().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_two_backoffs() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let calls = Arc::new(Mutex::new(Vec::new()));

        let result = policy
            .run(|| {
                let calls = Arc::clone(&calls);
                async move {
                    let mut calls = calls.lock();
                    calls.push(Instant::now());
                    if calls.len() < 3 {
                        Err(Error::RateLimited)
                    } else {
                        Ok("verdict")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "verdict");

        let calls = calls.lock();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1] - calls[0], Duration::from_millis(1000));
        assert_eq!(calls[2] - calls[1], Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<()> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::Remote { status: 500 }) }
            })
            .await;

        assert!(matches!(result, Err(Error::Remote { status: 500 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_return_rate_limited() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let calls = AtomicU32::new(0);

        let result: Result<()> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::RateLimited) }
            })
            .await;

        assert!(matches!(result, Err(Error::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
