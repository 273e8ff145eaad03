//! Cluster token ownership and comparison.

use sha2::{Digest, Sha256};
use std::sync::{Arc, RwLock};

/// Source of the current cluster-wide shared secret.
///
/// Read on every request: the token may rotate with cluster state, so
/// callers must not cache it.
pub trait ClusterTokenProvider: Send + Sync {
    /// Return the token currently accepted by the cluster.
    fn current_token(&self) -> String;

    /// Check a presented token against the current one.
    ///
    /// Exact match only. Both sides are compared as SHA-256 digests so the
    /// comparison cost does not depend on the length of the common prefix.
    fn matches(&self, candidate: &str) -> bool {
        digest(candidate) == digest(&self.current_token())
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}

/// Owner of the cluster token for this node.
#[derive(Clone)]
pub struct NodeManager {
    token: Arc<RwLock<String>>,
}

impl NodeManager {
    /// Create a node manager holding the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.into())),
        }
    }

    /// Build from configuration, minting a fresh token when none is set.
    pub fn from_config(configured: Option<String>) -> Self {
        match configured.filter(|t| !t.is_empty()) {
            Some(token) => Self::new(token),
            None => {
                tracing::warn!("No cluster token configured, generated a new one");
                Self::new(uuid::Uuid::new_v4().to_string())
            }
        }
    }

    /// Replace the cluster token held by this manager.
    ///
    /// The server itself never calls this; the token stays as configured
    /// for the life of the process. Embedders holding a clone can swap it.
    #[allow(dead_code)]
    pub fn rotate(&self, token: impl Into<String>) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.into();
        tracing::info!("Cluster token rotated");
    }
}

impl ClusterTokenProvider for NodeManager {
    fn current_token(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
