//! Inbound → upstream header rewriting.

use axum::http::header::{
    ACCEPT_ENCODING, AUTHORIZATION, CONNECTION, CONTENT_LENGTH, COOKIE, HOST, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::app::errors::GatewayError;
use crate::context::SessionCredential;

const KEEP_ALIVE: &str = "keep-alive";

/// Headers never forwarded: hop-by-hop, host-identifying, and the inbound
/// credentials (the gateway injects its own `Authorization`).
///
/// `Accept-Encoding` is dropped because responses are rebuilt without the
/// upstream `Content-Encoding`.
fn is_stripped(name: &HeaderName) -> bool {
    [
        CONNECTION,
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
        TE,
        TRAILER,
        TRANSFER_ENCODING,
        UPGRADE,
        HOST,
        CONTENT_LENGTH,
        COOKIE,
        AUTHORIZATION,
        ACCEPT_ENCODING,
    ]
    .contains(name)
        || name.as_str() == KEEP_ALIVE
}

/// Copy the inbound headers minus everything in [`is_stripped`] and anything
/// the `Connection` header names as hop-by-hop.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let connection_listed: Vec<String> = inbound
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if is_stripped(name) || connection_listed.iter().any(|t| t == name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

pub fn inject_bearer(headers: &mut HeaderMap, credential: &SessionCredential) -> Result<(), GatewayError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.as_str()))
        .map_err(|_| GatewayError::AuthenticationRequired)?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(())
}
