//! Retry utilities for the HTTP transport.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses and 5xx server errors. Non-retriable errors
//! (404s, other 4xx statuses, parse failures) are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScraperError::RateLimited`]: HTTP 429, the server has asked us to back off.
/// - [`ScraperError::Http`]: network-level failure (connection reset, timeout, etc.).
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else is returned to the caller on the first failure.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. If all retries are exhausted the last error is returned.
///
/// # Backoff schedule (example with `backoff_base_secs = 1`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|--------------------------|
/// | 0 (initial) | none |
/// | 1 (first retry) | 1 × 2^0 = 1 s |
/// | 2 (second retry) | 1 × 2^1 = 2 s |
/// | 3 (third retry) | 1 × 2^2 = 4 s |
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        // A server-supplied Retry-After wins over the computed delay when longer.
        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let ScraperError::RateLimited {
            retry_after_secs, ..
        } = &err
        {
            delay_secs = delay_secs.max((*retry_after_secs).min(backoff_cap(backoff_base_secs)));
        }
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

/// Ceiling applied to a server's `Retry-After` hint. A zero base disables
/// waiting altogether.
fn backoff_cap(backoff_base_secs: u64) -> u64 {
    if backoff_base_secs == 0 {
        0
    } else {
        120
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited(retry_after_secs: u64) -> ScraperError {
        ScraperError::RateLimited {
            domain: "www.bunnings.com.au".to_owned(),
            retry_after_secs,
        }
    }

    fn status(code: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: code,
            url: "https://www.bunnings.com.au/search/products?q=dewalt".to_owned(),
        }
    }

    async fn count_attempts(max_retries: u32, fail_with: fn() -> ScraperError) -> (u32, bool) {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(max_retries, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(fail_with())
            }
        })
        .await;
        (call_count.load(Ordering::SeqCst), result.is_err())
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited(30))
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let (calls, failed) = count_attempts(2, || rate_limited(0)).await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls, 3);
        assert!(failed);
    }

    #[tokio::test]
    async fn retries_server_errors() {
        let (calls, _) = count_attempts(2, || status(503)).await;
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let (calls, _) = count_attempts(3, || status(403)).await;
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let (calls, _) = count_attempts(3, || ScraperError::NotFound {
            url: "https://www.bunnings.com.au/p/1".to_owned(),
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn does_not_retry_malformed_response() {
        let (calls, _) = count_attempts(3, || ScraperError::MalformedResponse {
            url: "https://api.example.com/reviews.json".to_owned(),
            reason: "missing Limit".to_owned(),
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_retries_means_single_attempt() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (calls, failed) = rt.block_on(count_attempts(0, || status(500)));
        assert_eq!(calls, 1);
        assert!(failed);
    }
}
