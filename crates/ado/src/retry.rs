//! Retry and backoff policy for Azure DevOps requests

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Waits between attempts. Injected so tests can observe backoff without sleeping.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Bounded retry schedule for throttled and failing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Ceiling for any single wait
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// 429 and every 5xx are retried
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Wait before the next attempt after a retryable response.
    ///
    /// An integer `Retry-After` wins, clamped to `[1s, max_backoff]`;
    /// otherwise the exponential schedule applies.
    pub fn backoff(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        match retry_after.and_then(|v| v.trim().parse::<u64>().ok()) {
            Some(secs) => Duration::from_secs(secs.max(1)).min(self.max_backoff),
            None => self.transport_backoff(attempt),
        }
    }

    /// `2^(attempt-1)` seconds, capped at `max_backoff`
    pub fn transport_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32);
        let secs = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        Duration::from_secs(secs).min(self.max_backoff)
    }

    /// Whether another attempt remains after `attempt`
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
