//! # ODR Configuration
//!
//! Configuration for proof retrieval and the in-process transport.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Light client ODR configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OdrConfig {
    /// Round-trip timeout for one proof request, in milliseconds.
    pub request_timeout_ms: u64,

    /// Largest proof accepted, in nodes.
    ///
    /// An honest proof holds one node per trie level, so anything close to
    /// this bound is a peer trying to bloat a view's cache.
    pub max_proof_nodes: usize,

    /// Outstanding requests buffered per peer channel.
    pub channel_capacity: usize,
}

impl Default for OdrConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            max_proof_nodes: 512,
            channel_capacity: 64,
        }
    }
}

impl OdrConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            request_timeout_ms: 200,
            max_proof_nodes: 64,
            channel_capacity: 8,
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
