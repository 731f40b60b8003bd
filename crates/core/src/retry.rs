//! Retry wrapper for remote operations
//!
//! Every put and delete runs through [`retry`]. There is no backoff and no
//! jitter, and errors are not classified: any failure is retried until the
//! policy runs out, after which the run is aborted.

use std::future::Future;

use crate::error::{Error, Result, chain};
use crate::log::LogSink;

/// Number of retries allowed per remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Total attempts per operation, the first try included
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Parse a user-supplied retry count; blank means the default
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        value
            .parse::<u32>()
            .map(Self::new)
            .map_err(|_| Error::Config(format!("max retries must be a number, got '{value}'")))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES)
    }
}

/// Run `op` until it succeeds or `policy.attempts()` tries have failed
///
/// Each failure is written to `log` with its full error chain. Before every
/// re-attempt a `"<operation> retrying (n/max)"` line is written. Once the
/// budget is spent the result is [`Error::RetriesExhausted`].
///
/// # Example
/// ```ignore
/// retry(&policy, log, "delete", key, || store.delete_object(bucket, key)).await?;
/// ```
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    log: &dyn LogSink,
    operation: &'static str,
    key: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0u32;

    loop {
        if retries > 0 {
            log.println(&format!(
                "{operation} retrying ({retries}/{})",
                policy.max_retries
            ));
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    operation,
                    key,
                    attempt = retries + 1,
                    max_attempts = policy.attempts(),
                    error = %e,
                    "Remote operation failed"
                );
                log.println(&format!("{operation} [{key}] failed: {}", chain(&e)));
            }
        }

        retries += 1;
        if retries > policy.max_retries {
            return Err(Error::RetriesExhausted {
                operation,
                key: key.to_string(),
                attempts: retries,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemorySink;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.attempts(), 4);
        assert_eq!(RetryPolicy::new(0).attempts(), 1);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(RetryPolicy::parse("").unwrap(), RetryPolicy::default());
        assert_eq!(RetryPolicy::parse(" 5 ").unwrap().max_retries, 5);
        assert!(matches!(
            RetryPolicy::parse("three"),
            Err(Error::Config(_))
        ));
        assert!(RetryPolicy::parse("-1").is_err());
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let log = MemorySink::new();
        let mut calls = 0;

        let result = retry(&RetryPolicy::default(), &log, "upload", "k", || {
            calls += 1;
            async { Ok::<_, Error>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
        assert!(log.lines().is_empty());
    }

    #[tokio::test]
    async fn test_retry_success_after_failure() {
        let log = MemorySink::new();
        let call_count = Arc::new(AtomicU32::new(0));
        let call_count_clone = call_count.clone();

        let result = retry(&RetryPolicy::new(2), &log, "upload", "dist/a.js", || {
            let cc = call_count_clone.clone();
            async move {
                let count = cc.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(Error::Network("timeout".to_string()))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(log.count_containing("retrying"), 2);
        assert_eq!(
            log.lines(),
            vec![
                "upload [dist/a.js] failed: Network error: timeout",
                "upload retrying (1/2)",
                "upload [dist/a.js] failed: Network error: timeout",
                "upload retrying (2/2)",
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_exhausted() {
        let log = MemorySink::new();
        let mut calls = 0;

        let result: Result<()> = retry(&RetryPolicy::new(2), &log, "delete", "old/a", || {
            calls += 1;
            async { Err(Error::Network("always fails".to_string())) }
        })
        .await;

        assert_eq!(calls, 3);
        assert_eq!(log.count_containing("retrying"), 2);
        match result {
            Err(Error::RetriesExhausted {
                operation,
                key,
                attempts,
            }) => {
                assert_eq!(operation, "delete");
                assert_eq!(key, "old/a");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retry_zero_retries() {
        let log = MemorySink::new();
        let mut calls = 0;

        let result: Result<()> = retry(&RetryPolicy::new(0), &log, "upload", "k", || {
            calls += 1;
            async { Err(Error::General("nope".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert_eq!(log.count_containing("retrying"), 0);
    }

    #[tokio::test]
    async fn test_retry_does_not_classify_errors() {
        let log = MemorySink::new();
        let mut calls = 0;

        let result: Result<()> = retry(&RetryPolicy::new(1), &log, "upload", "k", || {
            calls += 1;
            async { Err(Error::InvalidPath("permanent".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
