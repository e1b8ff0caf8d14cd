// generation-gateway-rs/src/retry.rs
//
// Retry schedule for non-streaming backend calls.
//
// Only timed-out attempts are retried. A call makes at most max_retries
// attempts (never fewer than one). The delay after failed attempt i
// (0-indexed) is base * 2^i with no jitter, and there is no sleep after the
// final attempt.

use std::future::Future;
use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};
use shared_types_rs::{DiagnosticError, Result};
use tracing::{error, warn};

const MAX_DELAY: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempt cap, the first attempt included. Zero behaves as one.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self { max_retries: 1, base_delay: Duration::ZERO }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.base_delay)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(MAX_DELAY)
            .with_max_elapsed_time(None)
            .build()
    }

    // The backoff crate adds up to a nanosecond even with zero
    // randomization; delays are whole milliseconds.
    fn next_delay(&self, backoff: &mut ExponentialBackoff) -> Duration {
        let delay = backoff.next_backoff().unwrap_or(self.base_delay);
        Duration::from_millis(delay.as_millis() as u64)
    }

    /// Delays slept between attempts, in order
    pub fn schedule(&self) -> Vec<Duration> {
        let mut backoff = self.create_backoff();
        (1..self.max_attempts())
            .map(|_| self.next_delay(&mut backoff))
            .collect()
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts. Exhausted timeouts surface as
    /// `BackendUnavailable`.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut backoff = self.create_backoff();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts() => {
                    let delay = self.next_delay(&mut backoff);
                    warn!(
                        operation = operation_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retryable error: {}. Retrying in {:?}",
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_retryable() => {
                    error!(
                        operation = operation_name,
                        attempts = attempt,
                        "Backend request failed after {} attempts: {}",
                        attempt,
                        err
                    );
                    return Err(DiagnosticError::backend_unavailable(format!(
                        "{} timed out after {} attempts",
                        operation_name, attempt
                    )));
                }
                Err(err) => {
                    error!(
                        operation = operation_name,
                        attempt,
                        kind = err.kind(),
                        "Backend request failed: {}",
                        err
                    );
                    return Err(err);
                }
            }
        }
    }
}
