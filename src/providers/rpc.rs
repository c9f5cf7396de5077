//! RPC read helpers
//!
//! Exponential backoff with jitter for idempotent chain reads. Writes are
//! never routed through here; a failed transaction surfaces immediately.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};

/// Maximum attempts per read
pub const MAX_READ_ATTEMPTS: u32 = 3;

/// Base retry delay in milliseconds
pub const BASE_RETRY_MS: u64 = 250;

/// Maximum retry delay in milliseconds
pub const MAX_RETRY_MS: u64 = 4000;

/// Jitter percentage applied to each delay
pub const RETRY_JITTER_PERCENT: u64 = 20;

/// Delay before retry number `attempt` (1-based), jitter included
pub fn backoff_delay(attempt: u32) -> Duration {
    let base_delay = BASE_RETRY_MS.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)));
    let capped_delay = base_delay.min(MAX_RETRY_MS);

    let jitter_range = (capped_delay * RETRY_JITTER_PERCENT) / 100;
    let jitter: i64 =
        rand::thread_rng().gen_range(-(jitter_range as i64)..=(jitter_range as i64));
    Duration::from_millis((capped_delay as i64 + jitter).max(50) as u64)
}

/// Run `op` until it succeeds, fails with a non-retryable code, or
/// `MAX_READ_ATTEMPTS` is reached.
pub async fn read_with_retry<T, F, Fut>(label: &str, mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.code.is_retryable() && attempt + 1 < MAX_READ_ATTEMPTS => {
                attempt += 1;
                let delay = backoff_delay(attempt);
                warn!(
                    "⏳ {} failed ({}), retry {}/{} in {}ms",
                    label,
                    e.code_str(),
                    attempt + 1,
                    MAX_READ_ATTEMPTS,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                debug!("{} gave up after {} attempts: {}", label, attempt + 1, e);
                return Err(e);
            }
        }
    }
}

/// Bound a future by `timeout`, mapping expiry to `RPC_TIMEOUT`
pub async fn with_timeout<T, Fut>(label: &str, timeout: Duration, fut: Fut) -> AppResult<T>
where
    Fut: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::new(
            ErrorCode::RpcTimeout,
            format!("{} timed out after {}ms", label, timeout.as_millis()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_delay_bounds() {
        for attempt in 1..=8 {
            let delay = backoff_delay(attempt).as_millis() as u64;
            let base = (BASE_RETRY_MS << (attempt - 1)).min(MAX_RETRY_MS);
            let jitter = base * RETRY_JITTER_PERCENT / 100;
            assert!(delay >= base - jitter && delay <= base + jitter, "attempt {attempt}: {delay}");
        }
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = read_with_retry("reserves", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::new(ErrorCode::RpcError, "connection reset"))
            } else {
                Ok(42u64)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stops_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: AppResult<()> = read_with_retry("reserves", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::new(ErrorCode::RpcTimeout, "slow node"))
        })
        .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::RpcTimeout);
        assert_eq!(calls.load(Ordering::SeqCst), MAX_READ_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_does_not_retry_final_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: AppResult<()> = read_with_retry("reserves", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::insufficient_liquidity("EXCESSIVE_OUTPUT_AMOUNT"))
        })
        .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::InsufficientLiquidity);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_timeout() {
        let result: AppResult<()> = with_timeout("fee history", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result.unwrap_err().code, ErrorCode::RpcTimeout);
    }
}
