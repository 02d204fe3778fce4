//! # Ephemeral Node Store
//!
//! Append-only cache of proof nodes for a single verified view.
//!
//! ## Invariants
//!
//! - Entries are never removed or rewritten once accepted.
//! - Merging identical `(key, bytes)` pairs again changes nothing.
//! - A node is only accepted under the key its bytes hash to, so nothing
//!   a peer sends can occupy a key an honest proof will need later.
//! - A proof that presents a cached key with different bytes is rejected
//!   as a whole; none of its nodes are merged.
//!
//! The store only implements [`NodeReader`]. There is no raw insert, so the
//! audited [`EphemeralStore::merge`] is the single way in.

use super::errors::VerificationError;
use super::messages::ProofSet;
use qc_04_state_trie::{node_matches_key, NodeReader, TrieError};
use std::collections::HashMap;

/// Append-only, content-addressed node cache.
#[derive(Debug, Default)]
pub struct EphemeralStore {
    nodes: HashMap<Vec<u8>, Vec<u8>>,
}

impl EphemeralStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node bytes under a raw store key.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.nodes.get(key).map(Vec::as_slice)
    }

    /// Merge a proof atomically, returning the number of new nodes.
    ///
    /// Every entry is checked before any is inserted: a malformed key, a
    /// conflict with a cached node (or with another entry of the same
    /// proof) or a new node that does not hash to its key rejects the whole
    /// proof.
    pub fn merge(&mut self, proof: &ProofSet) -> Result<usize, VerificationError> {
        let mut staged: HashMap<Vec<u8>, &Vec<u8>> = HashMap::with_capacity(proof.len());

        for (hex_key, data) in proof.iter() {
            let key =
                hex::decode(hex_key).map_err(|_| VerificationError::MalformedKey(hex_key.clone()))?;

            let known = self
                .nodes
                .get(&key)
                .or_else(|| staged.get(&key).copied());
            match known {
                Some(existing) if existing == data => {}
                Some(_) => {
                    return Err(VerificationError::ConflictingNode {
                        key: hex_key.clone(),
                    })
                }
                None if !node_matches_key(&key, data) => {
                    return Err(VerificationError::HashMismatch {
                        key: hex_key.clone(),
                    })
                }
                None => {
                    staged.insert(key, data);
                }
            }
        }

        let added = staged.len();
        self.nodes
            .extend(staged.into_iter().map(|(key, data)| (key, data.clone())));
        Ok(added)
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been merged yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeReader for EphemeralStore {
    fn get_node(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrieError> {
        Ok(self.nodes.get(key).cloned())
    }
}
