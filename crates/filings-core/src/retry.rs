//! Fixed-delay retry for transient collaborator failures.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::error::{FilingsError, Result};

/// Default number of attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default flat delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Retry policy with a flat delay between attempts.
///
/// Only errors for which [`FilingsError::is_transient`] is true are retried;
/// anything else is returned from the first failing attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt cap and delay.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A policy that tries exactly once.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Runs `operation` until it succeeds, fails permanently, or the attempt
    /// cap is reached, in which case [`FilingsError::RetriesExhausted`] wraps
    /// the last error.
    pub async fn run<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    warn!(what, attempts = attempt, error = %e, "Giving up");
                    return Err(FilingsError::RetriesExhausted {
                        attempts: attempt,
                        last_error: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(
                        what,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Transient failure, retrying"
                    );
                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
