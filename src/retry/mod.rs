//! Retry policy for rate-limited external calls.
//!
//! Both HTTP providers accept a [`RetryPolicy`]. The search path runs with
//! [`RetryPolicy::disabled`] so provider errors propagate to the caller
//! untouched; batch callers (ingestion-style tooling) can opt into retries
//! with backoff instead of hand-rolling 429 loops at each call site.

use std::time::Duration;
use tracing::debug;

/// Bounded retry with linear backoff and a caller-supplied retryable-error
/// predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// A policy of `max_attempts` total attempts, waiting
    /// `base_delay * attempt` between tries.
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Single attempt, no waiting. The default for the search path.
    pub const fn disabled() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Total attempts allowed (including the first).
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before the attempt following failed attempt number `attempt`.
    #[inline]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or
    /// exhausts the attempt budget. The last error is returned as-is.
    pub async fn run<T, E, F, Fut, P>(&self, is_retryable: P, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let budget = self.max_attempts();
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < budget && is_retryable(&err) => {
                    let delay = self.backoff(attempt);
                    debug!(
                        attempt,
                        budget,
                        delay_ms = delay.as_millis() as u64,
                        "retryable error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}
