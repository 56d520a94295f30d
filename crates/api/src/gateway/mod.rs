//! Authenticated pass-through to the backend.
//!
//! One inbound request becomes one or more sequential upstream attempts
//! against the same target: same method, same filtered headers, same body.

pub mod body;
pub mod headers;
pub mod normalize;
pub mod retry;

use axum::body::Body;
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::app::errors::GatewayError;
use crate::config::GatewayConfig;
use crate::context::SessionCredential;

use self::body::ReplayableBody;
use self::retry::Retryable;

/// An inbound request, already split from the routing prefix.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    /// Path segments after the proxy prefix, still percent-encoded.
    pub path_segments: Vec<String>,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Body,
    pub credential: Option<SessionCredential>,
}

pub struct Gateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: GatewayConfig) -> Self {
        Self { http, config }
    }

    /// `base + "/" + segments + "?" + query`, with the query kept verbatim.
    pub fn target_url(&self, segments: &[String], query: Option<&str>) -> String {
        let base = self.config.backend_base_url.trim_end_matches('/');
        let mut target = format!("{base}/{}", segments.join("/"));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        target
    }

    pub async fn forward(&self, request: ForwardRequest) -> Result<Response, GatewayError> {
        let span = tracing::info_span!(
            "gateway_forward",
            request_id = %Uuid::now_v7(),
            method = %request.method,
            path = %request.path_segments.join("/"),
        );
        self.forward_inner(request).instrument(span).await
    }

    async fn forward_inner(&self, request: ForwardRequest) -> Result<Response, GatewayError> {
        let ForwardRequest {
            method,
            path_segments,
            query,
            headers,
            body,
            credential,
        } = request;

        let credential = credential.ok_or(GatewayError::AuthenticationRequired)?;

        let target = self.target_url(&path_segments, query.as_deref());
        let target = reqwest::Url::parse(&target)
            .map_err(|err| GatewayError::InvalidTarget(format!("{target}: {err}")))?;

        let mut outbound = headers::forwardable_headers(&headers);
        headers::inject_bearer(&mut outbound, &credential)?;

        let body = carries_body(&method).then(|| ReplayableBody::new(body));

        let reply = self
            .config
            .retry
            .run(|attempt| {
                tracing::debug!(attempt = attempt + 1, "forwarding to backend");
                let mut builder = self
                    .http
                    .request(method.clone(), target.clone())
                    .headers(outbound.clone());
                if let Some(body) = &body {
                    builder = builder.body(body.into_reqwest());
                }
                let sent = builder.send();
                let body = body.clone();
                async move {
                    let err = match sent.await {
                        Ok(reply) => return Ok(reply),
                        Err(err) => err,
                    };
                    match &body {
                        Some(body) => match body.failure().await {
                            Some(reason) => Err(AttemptError::InboundBody(reason)),
                            None => Err(AttemptError::Upstream(err)),
                        },
                        None => Err(AttemptError::Upstream(err)),
                    }
                }
            })
            .await?;

        tracing::info!(status = reply.status().as_u16(), "backend answered");
        normalize::normalize(&method, reply).await
    }
}

/// Why one upstream attempt produced no response.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Upstream(reqwest::Error),

    /// The client's own body stream broke; replaying it would fail the same way.
    #[error("inbound request body failed: {0}")]
    InboundBody(String),
}

impl Retryable for AttemptError {
    fn is_retryable(&self) -> bool {
        matches!(self, AttemptError::Upstream(_))
    }
}

fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}
