//! Exponential backoff with jitter for store operations.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use search_cache_core::{
    DB_RETRY_BACKOFF_FACTOR, DB_RETRY_INITIAL_DELAY_MS, DB_RETRY_JITTER_MS, DB_RETRY_MAX_ATTEMPTS,
};

/// How many times an operation is attempted and how long to wait in between.
///
/// The wait before retry `n` (1-based) is `initial_delay * backoff_factor^(n-1)`
/// shifted by a uniform random offset in `[-jitter, +jitter]`, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DB_RETRY_MAX_ATTEMPTS,
            Duration::from_millis(DB_RETRY_INITIAL_DELAY_MS),
            DB_RETRY_BACKOFF_FACTOR,
            Duration::from_millis(DB_RETRY_JITTER_MS),
        )
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_factor: u32,
        jitter: Duration,
    ) -> Self {
        Self { max_attempts, initial_delay, backoff_factor, jitter }
    }

    /// Retries without sleeping.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, 1, Duration::ZERO)
    }

    /// Wait before retry number `retry` (1-based), shifted by `jitter_micros`.
    #[must_use]
    pub fn delay_for(&self, retry: u32, jitter_micros: i64) -> Duration {
        let exponent = retry.saturating_sub(1);
        let base = self.initial_delay.saturating_mul(self.backoff_factor.saturating_pow(exponent));
        let offset = Duration::from_micros(jitter_micros.unsigned_abs());
        if jitter_micros >= 0 { base.saturating_add(offset) } else { base.saturating_sub(offset) }
    }

    fn sample_jitter_micros(&self) -> i64 {
        let max = i64::try_from(self.jitter.as_micros()).unwrap_or(i64::MAX);
        if max == 0 {
            return 0;
        }
        rand::rng().random_range(-max..=max)
    }

    /// Run `attempt` until it succeeds, fails with an error `is_retryable`
    /// rejects, or `max_attempts` is reached. The last error is returned as-is.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        operation: &'static str,
        is_retryable: P,
        mut attempt: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut tried: u32 = 1;
        loop {
            match attempt().await {
                Ok(value) => {
                    if tried > 1 {
                        tracing::debug!(operation, attempts = tried, "succeeded after retry");
                    }
                    return Ok(value);
                },
                Err(err) if tried < max_attempts && is_retryable(&err) => {
                    let delay = self.delay_for(tried, self.sample_jitter_micros());
                    tracing::warn!(
                        operation,
                        attempt = tried,
                        max_attempts,
                        delay = ?delay,
                        error = %err,
                        "store operation failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    tried += 1;
                },
                Err(err) => {
                    if is_retryable(&err) {
                        tracing::error!(operation, attempts = tried, error = %err, "retries exhausted");
                    }
                    return Err(err);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;

    fn transient() -> StorageError {
        StorageError::from(sqlx::Error::PoolTimedOut)
    }

    #[test]
    fn default_matches_store_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(10));
        assert_eq!(policy.backoff_factor, 2);
        assert_eq!(policy.jitter, Duration::from_millis(10));
    }

    #[test]
    fn delay_doubles_per_retry() {
        let policy = RetryPolicy::default();
        let schedule: Vec<_> = (1..=4).map(|n| policy.delay_for(n, 0)).collect();
        assert_eq!(
            schedule,
            [10, 20, 40, 80].map(Duration::from_millis).to_vec()
        );
    }

    #[test]
    fn jitter_shifts_and_floors_at_zero() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1, 10_000), Duration::from_millis(20));
        assert_eq!(policy.delay_for(1, -10_000), Duration::ZERO);
        assert_eq!(policy.delay_for(1, -25_000), Duration::ZERO);
        assert_eq!(policy.delay_for(3, -5_000), Duration::from_millis(35));
    }

    #[test]
    fn sampled_jitter_stays_in_range() {
        let policy = RetryPolicy::default();
        for _ in 0..1000 {
            let j = policy.sample_jitter_micros();
            assert!((-10_000..=10_000).contains(&j), "jitter {j} out of range");
        }
        assert_eq!(RetryPolicy::immediate(3).sample_jitter_micros(), 0);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let mut calls = 0u32;
        let result = RetryPolicy::immediate(5)
            .run("test", StorageError::is_retryable, || {
                calls += 1;
                let n = calls;
                async move { if n <= 3 { Err(transient()) } else { Ok(n) } }
            })
            .await;
        assert_eq!(result.unwrap(), 4);
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts_with_original_error() {
        let mut calls = 0u32;
        let result: Result<(), _> = RetryPolicy::immediate(5)
            .run("test", StorageError::is_retryable, || {
                calls += 1;
                async { Err(transient()) }
            })
            .await;
        assert_eq!(calls, 5);
        assert!(matches!(result, Err(StorageError::Database(sqlx::Error::PoolTimedOut))));
    }

    #[tokio::test]
    async fn non_retryable_error_fails_fast() {
        let mut calls = 0u32;
        let result: Result<(), _> = RetryPolicy::immediate(5)
            .run("test", StorageError::is_retryable, || {
                calls += 1;
                async { Err(StorageError::decode("user_id", "wrong type")) }
            })
            .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(StorageError::Deserialization { column: "user_id", .. })));
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let mut calls = 0u32;
        let result: Result<(), _> = RetryPolicy::immediate(0)
            .run("test", StorageError::is_retryable, || {
                calls += 1;
                async { Err(transient()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn default_policy_sleeps_between_attempts() {
        let mut calls = 0u32;
        let started = std::time::Instant::now();
        let result = RetryPolicy::default()
            .run("test", StorageError::is_retryable, || {
                calls += 1;
                let n = calls;
                async move { if n <= 2 { Err(transient()) } else { Ok(()) } }
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(calls, 3);
        // second wait is 20ms minus at most 10ms of jitter
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
