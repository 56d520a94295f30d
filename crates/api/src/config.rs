//! Gateway configuration, read once at startup from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::gateway::retry::RetryPolicy;

pub const DEFAULT_BACKEND_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SESSION_COOKIE: &str = "access_token";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend origin; the proxied path is appended to it.
    pub backend_base_url: String,
    pub bind_addr: String,
    pub session_cookie: String,
    pub retry: RetryPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new(backend_base_url: impl Into<String>) -> Self {
        Self {
            backend_base_url: backend_base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn from_env() -> Self {
        let defaults = RetryPolicy::default();

        let backend_base_url = std::env::var("BACKEND_BASE_URL").unwrap_or_else(|_| {
            tracing::warn!(
                default = DEFAULT_BACKEND_BASE_URL,
                "BACKEND_BASE_URL not set; using local default"
            );
            DEFAULT_BACKEND_BASE_URL.to_string()
        });

        let retry = RetryPolicy {
            max_attempts: env_or("GATEWAY_MAX_ATTEMPTS", defaults.max_attempts),
            initial_delay: Duration::from_millis(env_or(
                "GATEWAY_INITIAL_DELAY_MS",
                defaults.initial_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(env_or(
                "GATEWAY_MAX_DELAY_MS",
                defaults.max_delay.as_millis() as u64,
            )),
            wait_budget: Duration::from_secs(env_or(
                "GATEWAY_WAIT_BUDGET_SECS",
                defaults.wait_budget.as_secs(),
            )),
        };

        Self {
            backend_base_url,
            bind_addr: std::env::var("GATEWAY_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            session_cookie: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
            retry,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Display + Copy,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + core::fmt::Display + Copy,
{
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, %default, "invalid value; using default");
        default
    })
}
