//! Per-call deadlines and bounded retries for store operations

use std::{future::Future, time::Duration};

use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Number of attempts made for an idempotent read
pub const MAX_READ_ATTEMPTS: u32 = 3;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Run a store call under a deadline, reporting expiry as `Unavailable`
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Unavailable(format!(
            "store call exceeded {}ms",
            limit.as_millis()
        ))),
    }
}

/// Repeat an idempotent read while it fails with a retryable error
///
/// Never use this for writes: a write that timed out may still have landed.
pub async fn retry_read<T, F, Fut>(operation: &str, mut call: F) -> StoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Err(e) if e.is_retryable() && attempt + 1 < MAX_READ_ATTEMPTS => {
                let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                warn!(
                    "{} failed, retrying in {}ms (attempt {}/{}): {}",
                    operation,
                    delay.as_millis(),
                    attempt + 1,
                    MAX_READ_ATTEMPTS,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
