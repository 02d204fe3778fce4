use super::rlp::RlpError;
use super::Hash;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    #[error("Missing trie node: {}", hex::encode(.0))]
    MissingNode(Hash),

    #[error("Node hash mismatch: expected {}, got {}", hex::encode(.expected), hex::encode(.actual))]
    HashMismatch { expected: Hash, actual: Hash },

    #[error("Malformed trie node: {0}")]
    MalformedNode(String),

    #[error("RLP decoding failed: {0}")]
    Rlp(#[from] RlpError),

    #[error("Trie depth exceeded: max {max}")]
    DepthExceeded { max: usize },
}
