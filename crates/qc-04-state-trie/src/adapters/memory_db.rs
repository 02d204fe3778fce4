use crate::domain::{node_key, Hash, TrieError, TrieNode};
use crate::ports::{NodeReader, NodeWriter};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory node source for full nodes and tests.
pub struct InMemoryNodeDb {
    nodes: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryNodeDb {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
        }
    }

    /// Load the nodes of a proof, decoding their hex keys.
    #[cfg(test)]
    pub(crate) fn from_proof(proof: &crate::domain::ProofNodes) -> Self {
        let nodes = proof
            .iter()
            .map(|(key, data)| (hex::decode(key).expect("proof keys are hex"), data.clone()))
            .collect();
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Encode `node`, store it under its hash in `prefix`, return the hash.
    pub fn insert_node(&self, prefix: &[u8], node: &TrieNode) -> Hash {
        let hash = node.hash();
        self.nodes
            .write()
            .insert(node_key(prefix, &hash), node.rlp_encode());
        hash
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl Default for InMemoryNodeDb {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeReader for InMemoryNodeDb {
    fn get_node(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrieError> {
        Ok(self.nodes.read().get(key).cloned())
    }
}

impl NodeWriter for InMemoryNodeDb {
    fn put_node(&self, key: Vec<u8>, data: Vec<u8>) -> Result<(), TrieError> {
        self.nodes.write().insert(key, data);
        Ok(())
    }

    fn batch_put(&self, batch: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), TrieError> {
        let mut nodes = self.nodes.write();
        for (key, data) in batch {
            nodes.insert(key, data);
        }
        Ok(())
    }
}
