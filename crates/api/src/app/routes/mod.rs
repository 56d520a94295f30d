use axum::{routing::get, Router};

pub mod proxy;
pub mod system;

pub const PROXY_PREFIX: &str = "/api/proxy";

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new().route(
        "/api/proxy/*path",
        get(proxy::forward)
            .post(proxy::forward)
            .put(proxy::forward)
            .patch(proxy::forward)
            .delete(proxy::forward),
    )
}
