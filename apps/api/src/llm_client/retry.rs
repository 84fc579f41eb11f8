//! Bounded retry with linear backoff around a single remote call.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::LlmError;

/// Retry policy for remote model calls.
///
/// `max_attempts` counts every call, the first one included. Between attempt
/// `n` and `n + 1` the policy sleeps `base_delay * n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. `op` receives the 1-based attempt number.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut last_error: Option<LlmError> = None;

        for attempt in 1..=max_attempts {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = self.delay_after(attempt);
                        warn!(
                            "LLM call attempt {attempt}/{max_attempts} failed ({e}), retrying after {}ms",
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        warn!("LLM call attempt {attempt}/{max_attempts} failed ({e}), giving up");
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Exhausted {
            attempts: max_attempts,
            last: Box::new(last_error.unwrap_or(LlmError::EmptyContent)),
        })
    }
}
