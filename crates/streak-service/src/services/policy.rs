//! Timeouts and retries for calls into the ports.
//!
//! Record store calls are authoritative: transient failures are retried with
//! exponential backoff and surface as [`ServiceError::Unavailable`] once the
//! budget is spent. Index and stream writes after a commit are advisory: their
//! failures are logged and dropped.

use std::future::Future;
use std::time::Duration;

use streak_common::CheckinPolicyConfig;
use streak_core::{DomainError, RepoResult};
use tokio::time::{sleep, timeout};
use tracing::warn;

use super::error::{ServiceError, ServiceResult};

/// Bounds applied to every port call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoPolicy {
    store_timeout: Duration,
    advisory_timeout: Duration,
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for IoPolicy {
    fn default() -> Self {
        Self::from(&CheckinPolicyConfig::default())
    }
}

impl From<&CheckinPolicyConfig> for IoPolicy {
    fn from(config: &CheckinPolicyConfig) -> Self {
        Self {
            store_timeout: config.store_timeout,
            advisory_timeout: config.advisory_timeout,
            max_attempts: config.max_retries.max(1),
            base_delay: config.retry_base_delay,
        }
    }
}

impl IoPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before attempt `attempt + 1`: base, 2x base, 4x base, ...
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * (1u32 << (attempt - 1).min(16))
    }

    /// One bounded attempt; a timeout becomes [`DomainError::Timeout`]
    pub async fn once<T, Fut>(&self, operation: &'static str, fut: Fut) -> RepoResult<T>
    where
        Fut: Future<Output = RepoResult<T>>,
    {
        timeout(self.store_timeout, fut)
            .await
            .unwrap_or(Err(DomainError::Timeout(operation)))
    }

    /// Run an idempotent authoritative call, retrying transient failures.
    ///
    /// Business-rule errors return immediately without another attempt.
    pub async fn with_retry<T, F, Fut>(&self, operation: &'static str, mut call: F) -> ServiceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RepoResult<T>>,
    {
        let mut attempt = 1;
        loop {
            let err = match self.once(operation, call()).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err.into()),
                Err(err) => err,
            };

            if attempt >= self.max_attempts {
                return Err(ServiceError::Unavailable {
                    operation,
                    attempts: attempt,
                    last_error: err,
                });
            }

            let delay = self.backoff(attempt);
            warn!(
                operation,
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient failure, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Single attempt for calls that must not be repeated blindly (inserts, deletes).
    ///
    /// A transient failure still maps to [`ServiceError::Unavailable`].
    pub async fn without_retry<T, Fut>(&self, operation: &'static str, fut: Fut) -> ServiceResult<T>
    where
        Fut: Future<Output = RepoResult<T>>,
    {
        match self.once(operation, fut).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_transient() => Err(ServiceError::Unavailable {
                operation,
                attempts: 1,
                last_error: err,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Best-effort call. Failures and timeouts are logged and yield `None`.
    pub async fn advisory<T, Fut>(&self, operation: &'static str, fut: Fut) -> Option<T>
    where
        Fut: Future<Output = RepoResult<T>>,
    {
        match timeout(self.advisory_timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                warn!(operation, error = %err, "Advisory write failed");
                None
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.advisory_timeout.as_millis() as u64,
                    "Advisory write timed out"
                );
                None
            }
        }
    }
}
