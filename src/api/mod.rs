//! HTTP API layer for the small file server.
//!
//! Provides the small file download endpoint and a health check.

pub mod handlers;
mod routes;
pub mod types;

pub use routes::build_router;
