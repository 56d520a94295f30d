//! `stockroom-core`: value types shared across the authorization boundary.
//!
//! This crate contains **pure** primitives (no IO, no transport concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ResourceKey, RoleCode};
