//! # Inbound Ports
//!
//! The state trie surface shared by full tries and light client views.

use crate::domain::{Hash, OdrError, ProofSet};
use async_trait::async_trait;

/// State trie API - inbound port.
///
/// Full nodes implement every method. A light client view is read-only and
/// answers every write with [`OdrError::UnsupportedOperation`].
#[async_trait]
pub trait StateTrieApi: Send + Sync {
    /// Value stored under `key`, or `None` when absent or unavailable.
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Store a value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), OdrError>;

    /// Persist pending writes and return the new root.
    fn commit(&self) -> Result<Hash, OdrError>;

    /// Delete every entry under a key prefix.
    fn delete_prefix(&self, prefix: &[u8]) -> Result<bool, OdrError>;

    /// Produce a proof for `key`.
    fn get_proof(&self, key: &[u8]) -> Result<ProofSet, OdrError>;

    /// Current root including uncommitted writes.
    fn hash(&self) -> Result<Hash, OdrError>;
}
