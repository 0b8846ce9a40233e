use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Exponential backoff for collaborator calls.
///
/// Sleeping goes through `tokio::time`, so dropping the future returned by
/// [`RetryPolicy::run_if`] abandons any pending attempt or delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (2.0 doubles the delay each time)
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset for text generation calls (3 attempts).
    /// Delays: 1s, 2s = 3s total wait time
    pub fn generation() -> Self {
        Self::new(3, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(5))
            .with_backoff_multiplier(2.0)
    }

    /// A single attempt, for callers that want to fail fast.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before the given attempt (0-indexed). The first attempt never waits.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }

    /// Run `operation` until it succeeds, `should_retry` rejects an error, or
    /// the attempts run out. Returns the last error on failure.
    ///
    /// A policy with `max_attempts == 0` still makes one attempt.
    pub async fn run_if<T, E, F, Fut, P>(
        &self,
        label: &str,
        mut operation: F,
        should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let delay = self.delay_for_attempt(attempt);
            if !delay.is_zero() {
                debug!(
                    "{}: Retry attempt {}/{} after {:?}",
                    label,
                    attempt + 1,
                    max_attempts,
                    delay
                );
                sleep(delay).await;
            }

            let error = match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("{}: Succeeded on attempt {}/{}", label, attempt + 1, max_attempts);
                    }
                    return Ok(result);
                }
                Err(e) => e,
            };

            if !should_retry(&error) {
                debug!("{}: Error is not retryable, failing immediately: {}", label, error);
                return Err(error);
            }

            let remaining = max_attempts - attempt - 1;
            if remaining == 0 {
                warn!("{}: All {} attempts failed. Last error: {}", label, max_attempts, error);
                return Err(error);
            }

            warn!(
                "{}: Attempt {}/{} failed ({}), {} retries remaining",
                label,
                attempt + 1,
                max_attempts,
                error,
                remaining
            );
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::generation()
    }
}
