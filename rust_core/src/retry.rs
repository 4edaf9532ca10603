//! Retry logic for transient API failures
//!
//! Provides automatic retry with exponential backoff for outbound requests.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::ApiFootballError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 100,
            max_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1` (attempts are 1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(
            self.base_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }
}

/// Execute an API call with automatic retry on transient failures
///
/// # Example
/// ```ignore
/// let body = execute_with_retry(
///     "standings",
///     || async { client.fetch_raw("standings", &params).await },
///     RetryPolicy::default(),
/// ).await?;
/// ```
pub async fn execute_with_retry<F, Fut, T>(
    label: &str,
    mut f: F,
    policy: RetryPolicy,
) -> Result<T, ApiFootballError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiFootballError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < policy.max_attempts && e.is_retriable() => {
                let backoff = policy.backoff(attempt);
                warn!(
                    "{} request failed (attempt {}/{}): {}. Retrying in {}ms",
                    label,
                    attempt,
                    policy.max_attempts,
                    e,
                    backoff.as_millis()
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}
