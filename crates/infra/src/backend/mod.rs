//! Backend privilege/menu sources.
//!
//! The backend owns role and privilege persistence; this layer only fetches
//! one role's grants at a time. Each fetch is independent so the resolver can
//! fan them out concurrently.

use thiserror::Error;

use stockroom_auth::{MenuEntry, PrivilegeSet};
use stockroom_core::RoleCode;

pub mod http;
pub mod in_memory;

pub use http::HttpBackendClient;
pub use in_memory::InMemoryBackend;

/// Failure to load one role's contribution.
///
/// Never fatal for a session: the resolver logs it and treats the role as
/// contributing nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Source of per-role privilege grants.
///
/// Implementations must be safe to call concurrently for different roles and
/// must not impose their own deadline beyond the transport's defaults.
#[async_trait::async_trait]
pub trait PrivilegeSource: Send + Sync {
    /// Fetch the grants for one (already mapped) backend role code.
    async fn fetch_role_privileges(&self, role_code: &RoleCode) -> Result<PrivilegeSet, FetchError>;
}

/// Source of per-role navigation menus.
#[async_trait::async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_role_menus(&self, role_code: &RoleCode) -> Result<Vec<MenuEntry>, FetchError>;
}

#[async_trait::async_trait]
impl<S> PrivilegeSource for std::sync::Arc<S>
where
    S: PrivilegeSource + ?Sized,
{
    async fn fetch_role_privileges(&self, role_code: &RoleCode) -> Result<PrivilegeSet, FetchError> {
        (**self).fetch_role_privileges(role_code).await
    }
}

#[async_trait::async_trait]
impl<S> MenuSource for std::sync::Arc<S>
where
    S: MenuSource + ?Sized,
{
    async fn fetch_role_menus(&self, role_code: &RoleCode) -> Result<Vec<MenuEntry>, FetchError> {
        (**self).fetch_role_menus(role_code).await
    }
}
