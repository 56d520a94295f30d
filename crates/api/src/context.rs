use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

/// Session credential for a request.
///
/// Opaque to the gateway: it is only checked for presence and forwarded as a
/// bearer token. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionCredential(<redacted>)")
    }
}

/// Find the session credential: `Authorization: Bearer <token>` first, then
/// the session cookie. Blank values count as absent.
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<SessionCredential> {
    extract_bearer(headers)
        .or_else(|| extract_cookie(headers, cookie_name))
        .map(SessionCredential::new)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
