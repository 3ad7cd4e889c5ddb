//! Shared building blocks for the weather dashboard crates.

pub mod errors;
pub mod http_client;
pub mod models;
pub mod tracing;
