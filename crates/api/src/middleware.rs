use std::sync::Arc;

use axum::{
    extract::State,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::errors::GatewayError;
use crate::context::extract_credential;

#[derive(Clone)]
pub struct SessionState {
    pub cookie_name: Arc<str>,
}

/// Rejects requests without a session credential before any backend call.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(credential) = extract_credential(req.headers(), &state.cookie_name) else {
        tracing::debug!(path = %req.uri().path(), "no session credential");
        return GatewayError::AuthenticationRequired.into_response();
    };

    req.extensions_mut().insert(credential);
    next.run(req).await
}
