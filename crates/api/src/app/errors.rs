use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use crate::gateway::retry::RetryError;
use crate::gateway::AttemptError;

pub const HIBERNATION_HINT: &str =
    "Backend may be hibernating. Please wait 30-60 seconds and try again.";

/// Gateway failures that are not the backend's own answer.
///
/// Backend error statuses are passed through untouched and never become a
/// `GatewayError`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Backend did not become available in time")]
    WaitBudgetExceeded { attempts: u32, elapsed_secs: u64 },

    #[error("Failed to reach backend")]
    NetworkFailure { attempts: u32, details: String },

    #[error("Failed to read request body")]
    InboundBody(String),

    #[error("Failed to read backend response")]
    UpstreamBody(String),

    #[error("Invalid backend target")]
    InvalidTarget(String),
}

impl GatewayError {
    fn details(&self) -> String {
        match self {
            GatewayError::AuthenticationRequired => String::new(),
            GatewayError::WaitBudgetExceeded {
                attempts,
                elapsed_secs,
            } => format!("gave up after {attempts} attempt(s) and {elapsed_secs}s of waiting"),
            GatewayError::NetworkFailure { attempts, details } => {
                format!("{details} (after {attempts} attempt(s))")
            }
            GatewayError::InboundBody(details)
            | GatewayError::UpstreamBody(details)
            | GatewayError::InvalidTarget(details) => details.clone(),
        }
    }
}

impl From<RetryError<AttemptError>> for GatewayError {
    fn from(err: RetryError<AttemptError>) -> Self {
        match err {
            RetryError::WaitBudgetExceeded {
                attempts, elapsed, ..
            } => GatewayError::WaitBudgetExceeded {
                attempts,
                elapsed_secs: elapsed.as_secs(),
            },
            RetryError::Exhausted {
                attempts,
                last_error: error,
            }
            | RetryError::NotRetryable { attempts, error } => match error {
                AttemptError::Upstream(err) => GatewayError::NetworkFailure {
                    attempts,
                    details: err.to_string(),
                },
                AttemptError::InboundBody(details) => GatewayError::InboundBody(details),
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        match self {
            GatewayError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, details = %other.details(), "gateway request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    other.to_string(),
                    other.details(),
                )
            }
        }
    }
}

/// The normalized failure envelope: `{error, details, hint}`.
pub fn json_error(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": error.into(),
            "details": details.into(),
            "hint": HIBERNATION_HINT,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_credential_is_exactly_the_401_body() {
        let resp = GatewayError::AuthenticationRequired.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await, json!({ "error": "Authentication required" }));
    }

    #[tokio::test]
    async fn broken_client_body_is_reported_as_such() {
        let err: GatewayError = RetryError::NotRetryable {
            attempts: 1,
            error: AttemptError::InboundBody("connection reset".to_string()),
        }
        .into();
        assert!(matches!(&err, GatewayError::InboundBody(d) if d == "connection reset"));

        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"], "Failed to read request body");
        assert_eq!(body["details"], "connection reset");
    }

    #[tokio::test]
    async fn fatal_failures_use_the_envelope() {
        let resp = GatewayError::WaitBudgetExceeded {
            attempts: 3,
            elapsed_secs: 3700,
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(resp).await;
        assert_eq!(body["error"], "Backend did not become available in time");
        assert_eq!(body["details"], "gave up after 3 attempt(s) and 3700s of waiting");
        assert_eq!(body["hint"], HIBERNATION_HINT);
    }
}
