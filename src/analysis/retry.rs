use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AnalysisError;

/// Fixed-count, fixed-delay retry
///
/// Every failure is retried the same way; there is no backoff and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent
    ///
    /// Sleeps `delay` between attempts but not after the last one. On
    /// exhaustion the last error is returned wrapped in
    /// [`AnalysisError::Exhausted`].
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, AnalysisError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AnalysisError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("{}: attempt {}/{} failed: {}", label, attempt, attempts, e);
                    if attempt >= attempts {
                        return Err(AnalysisError::Exhausted {
                            attempts,
                            last: Box::new(e),
                        });
                    }
                }
            }

            tokio::time::sleep(self.delay).await;
            attempt += 1;
            debug!("{}: retry {} of {}", label, attempt - 1, attempts - 1);
        }
    }
}
