//! Infrastructure layer: backend clients, privilege resolution, session context.

pub mod backend;
pub mod config;
pub mod resolver;
pub mod session;

pub use backend::{FetchError, HttpBackendClient, InMemoryBackend, MenuSource, PrivilegeSource};
pub use config::BackendConfig;
pub use resolver::PrivilegeResolver;
pub use session::Session;
