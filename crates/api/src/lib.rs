//! HTTP gateway: authenticated pass-through to a backend that hibernates.

pub mod app;
pub mod config;
pub mod context;
pub mod gateway;
pub mod middleware;
