//! HTTP application wiring.
//!
//! - `routes/`: handlers (`proxy.rs` for the pass-through, `system.rs` for health)
//! - `errors.rs`: the failure envelope

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::GatewayConfig;
use crate::gateway::Gateway;
use crate::middleware;

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: GatewayConfig) -> Router {
    let session_state = middleware::SessionState {
        cookie_name: Arc::from(config.session_cookie.as_str()),
    };
    let gateway = Arc::new(Gateway::new(config));

    // Protected routes: require a session credential.
    let protected = routes::router()
        .layer(Extension(gateway))
        .layer(axum::middleware::from_fn_with_state(
            session_state,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
