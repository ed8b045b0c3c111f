//! Bounded retry with exponential backoff for completion-service calls.
//!
//! Attempts are strictly sequential: attempt N+1 starts only after attempt N
//! failed and its backoff delay elapsed. Every attempt runs under a deadline.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::llm_client::LlmError;

/// Hard attempt budget for every external call.
pub const MAX_ATTEMPTS: u32 = 3;

/// Errors that know whether another attempt could help.
pub trait Retryable: Sized + std::fmt::Display {
    fn is_retryable(&self) -> bool;

    /// Wraps the final error once the attempt budget is spent.
    fn exhausted(attempts: u32, last: Self) -> Self;

    /// Produced when an attempt overruns its deadline.
    fn timed_out(after: Duration) -> Self
    where
        Self: From<LlmError>,
    {
        LlmError::Timeout {
            secs: after.as_secs(),
        }
        .into()
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(8000),
            attempt_timeout: Duration::from_secs(90),
        }
    }
}

impl RetryPolicy {
    /// Backoff before attempt `attempt` (0-based): base, 2×base, 4×base … capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: Retryable + From<LlmError>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let delay = self.delay_for(attempt);
            if !delay.is_zero() {
                debug!("{label}: retrying after {}ms...", delay.as_millis());
                tokio::time::sleep(delay).await;
            }

            let outcome = match tokio::time::timeout(self.attempt_timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(E::timed_out(self.attempt_timeout)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    attempt += 1;
                    if attempt >= attempts {
                        warn!("{label}: giving up after {attempts} attempts: {e}");
                        return Err(E::exhausted(attempts, e));
                    }
                    warn!("{label}: attempt {attempt}/{attempts} failed: {e}");
                }
            }
        }
    }
}
