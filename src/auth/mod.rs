//! Cluster authentication for the small file server.
//!
//! Cluster nodes authenticate with one shared token owned by the node
//! manager rather than with per-user credentials.

mod cluster_token;

pub use cluster_token::*;
