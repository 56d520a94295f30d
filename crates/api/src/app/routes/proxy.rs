use std::sync::Arc;

use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::context::SessionCredential;
use crate::gateway::{ForwardRequest, Gateway};

use super::PROXY_PREFIX;

const FORWARDED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

pub async fn forward(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(credential): Extension<SessionCredential>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    // axum routes HEAD to GET handlers.
    if !FORWARDED_METHODS.contains(&method) {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let request = ForwardRequest {
        method,
        path_segments: path_segments(uri.path()),
        query: uri.query().map(str::to_string),
        headers,
        body,
        credential: Some(credential),
    };

    match gateway.forward(request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Segments after the proxy prefix, left percent-encoded as received.
fn path_segments(path: &str) -> Vec<String> {
    path.strip_prefix(PROXY_PREFIX)
        .unwrap_or(path)
        .trim_start_matches('/')
        .split('/')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_after_the_prefix() {
        assert_eq!(path_segments("/api/proxy/students/42"), vec!["students", "42"]);
        assert_eq!(
            path_segments("/api/proxy/role_menus/role/ADMIN"),
            vec!["role_menus", "role", "ADMIN"]
        );
    }

    #[test]
    fn keeps_encoding_and_trailing_slash() {
        assert_eq!(path_segments("/api/proxy/files/a%20b"), vec!["files", "a%20b"]);
        assert_eq!(path_segments("/api/proxy/items/"), vec!["items", ""]);
    }
}
