use crate::domain::TrieError;

/// Read side of a content-addressed node source.
///
/// Keys are `prefix || hash` (see [`node_key`](crate::domain::node_key)).
pub trait NodeReader: Send + Sync {
    fn get_node(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrieError>;
}

/// Write side of a node source, implemented only by stores a full node owns.
///
/// Kept apart from [`NodeReader`] so read-only stores cannot be handed to
/// code that mutates.
pub trait NodeWriter: NodeReader {
    fn put_node(&self, key: Vec<u8>, data: Vec<u8>) -> Result<(), TrieError>;
    fn batch_put(&self, nodes: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), TrieError>;
}
