//! Bounded exponential backoff for a backend that hibernates.
//!
//! A 502/503 means "still cold-starting" and is retried, as is a
//! connection-level failure. Every other status is the backend's
//! authoritative answer and is returned immediately.

use std::future::Future;
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::time::Instant;

/// Anything carrying an upstream status code.
pub trait UpstreamStatus {
    fn status(&self) -> StatusCode;
}

impl UpstreamStatus for reqwest::Response {
    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }
}

/// Whether a failed attempt is worth repeating against the same target.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Statuses that mean the backend process is still waking up.
pub fn is_cold_start(status: StatusCode) -> bool {
    status == StatusCode::BAD_GATEWAY || status == StatusCode::SERVICE_UNAVAILABLE
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("wait budget of {budget:?} exceeded after {attempts} attempt(s) ({elapsed:?} elapsed)")]
    WaitBudgetExceeded {
        attempts: u32,
        elapsed: Duration,
        budget: Duration,
    },

    #[error("backend unreachable after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    #[error("attempt {attempts} failed and cannot be repeated: {error}")]
    NotRetryable { attempts: u32, error: E },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Cumulative wall-clock ceiling, checked before every attempt.
    pub wait_budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(32),
            wait_budget: Duration::from_secs(60 * 60),
        }
    }
}

impl RetryPolicy {
    /// `min(initial_delay * 2^attempt, max_delay)`, where `attempt` is the
    /// zero-based index of the attempt that just failed.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Drive `attempt` until it yields an authoritative answer.
    ///
    /// Attempts are strictly sequential. The closure receives the zero-based
    /// attempt index. The last attempt's 502/503 is returned as-is rather than
    /// turned into an error.
    pub async fn run<R, E, F, Fut>(&self, mut attempt: F) -> Result<R, RetryError<E>>
    where
        R: UpstreamStatus,
        E: core::fmt::Display + Retryable,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let started = Instant::now();
        let mut index = 0u32;

        loop {
            let elapsed = started.elapsed();
            if elapsed > self.wait_budget {
                tracing::error!(
                    attempts = index,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "backend wait budget exceeded; giving up"
                );
                return Err(RetryError::WaitBudgetExceeded {
                    attempts: index,
                    elapsed,
                    budget: self.wait_budget,
                });
            }

            let last = index + 1 >= max_attempts;
            match attempt(index).await {
                Ok(reply) if is_cold_start(reply.status()) && !last => {
                    let delay = self.backoff_delay(index);
                    tracing::info!(
                        attempt = index + 1,
                        max_attempts,
                        status = reply.status().as_u16(),
                        delay_ms = delay.as_millis() as u64,
                        "backend cold-starting; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(reply) => {
                    if index > 0 {
                        tracing::info!(
                            attempts = index + 1,
                            status = reply.status().as_u16(),
                            "backend answered after retries"
                        );
                    }
                    return Ok(reply);
                }
                Err(err) if !err.is_retryable() => {
                    tracing::warn!(attempt = index + 1, error = %err, "attempt failed; not retrying");
                    return Err(RetryError::NotRetryable {
                        attempts: index + 1,
                        error: err,
                    });
                }
                Err(err) if !last => {
                    let delay = self.backoff_delay(index);
                    tracing::warn!(
                        attempt = index + 1,
                        max_attempts,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "backend request failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(attempts = index + 1, error = %err, "backend request failed; attempts exhausted");
                    return Err(RetryError::Exhausted {
                        attempts: index + 1,
                        last_error: err,
                    });
                }
            }

            index += 1;
        }
    }
}
