//! Upstream response → client response.

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::app::errors::GatewayError;

/// Normalize one upstream response.
///
/// DELETE + 204 passes through with no body and no parse attempt. Anything
/// else is read exactly once: JSON bodies are re-emitted as JSON, everything
/// else verbatim with the upstream content type (or `text/plain`). The status
/// is always the upstream one, error statuses included.
pub async fn normalize(method: &Method, upstream: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream.status();

    if *method == Method::DELETE && status == StatusCode::NO_CONTENT {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let body = upstream
        .bytes()
        .await
        .map_err(|e| GatewayError::UpstreamBody(e.to_string()))?;

    Ok(normalize_body(status, content_type, body))
}

pub fn normalize_body(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => (status, axum::Json(value)).into_response(),
        Err(_) => {
            let content_type = content_type
                .unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));
            (status, [(CONTENT_TYPE, content_type)], Body::from(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16, content_type: Option<&'static str>, body: &'static str) -> reqwest::Response {
        let mut builder = axum::http::Response::builder().status(status);
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    async fn read(resp: Response) -> (StatusCode, Option<String>, Bytes) {
        let status = resp.status();
        let ct = resp
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, ct, body)
    }

    #[tokio::test]
    async fn delete_no_content_skips_the_body_entirely() {
        let resp = normalize(&Method::DELETE, upstream(204, None, "{ not json"))
            .await
            .unwrap();
        let (status, _, body) = read(resp).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn json_is_reemitted_with_the_original_status() {
        let resp = normalize(
            &Method::POST,
            upstream(201, Some("application/json"), r#"{ "id" : 7 }"#),
        )
        .await
        .unwrap();
        let (status, ct, body) = read(resp).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(ct.as_deref(), Some("application/json"));
        assert_eq!(&body[..], br#"{"id":7}"#);
    }

    #[tokio::test]
    async fn non_json_passes_through_verbatim() {
        let resp = normalize(&Method::GET, upstream(200, Some("text/csv"), "id,name\n1,Acme\n"))
            .await
            .unwrap();
        let (status, ct, body) = read(resp).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("text/csv"));
        assert_eq!(&body[..], b"id,name\n1,Acme\n");
    }

    #[tokio::test]
    async fn missing_content_type_defaults_to_text_plain() {
        let resp = normalize(&Method::GET, upstream(200, None, "pong")).await.unwrap();
        let (_, ct, body) = read(resp).await;
        assert_eq!(ct.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(&body[..], b"pong");
    }

    #[tokio::test]
    async fn backend_errors_keep_status_and_payload() {
        let resp = normalize(
            &Method::PUT,
            upstream(422, Some("application/json"), r#"{"detail":"name is required"}"#),
        )
        .await
        .unwrap();
        let (status, _, body) = read(resp).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["detail"], "name is required");
    }

    #[tokio::test]
    async fn no_content_on_other_methods_is_still_read() {
        let resp = normalize(&Method::POST, upstream(204, None, "")).await.unwrap();
        let (status, _, body) = read(resp).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }
}
