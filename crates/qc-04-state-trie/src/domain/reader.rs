//! # Verified Trie Reads
//!
//! Resolves keys against a state root using only nodes fetched from a
//! [`NodeReader`]. Every node is checked against the hash its parent
//! committed to before it is decoded, so a node source full of untrusted
//! bytes can at worst make a lookup fail, never make it lie.
//!
//! The walk is a plain loop bounded by [`MAX_TRIE_DEPTH`]; hostile inputs
//! cannot drive it into deep recursion.

use super::rlp::keccak256;
use super::{node_key, Hash, Nibbles, Step, TrieError, TrieNode, EMPTY_TRIE_ROOT, MAX_TRIE_DEPTH};
use crate::ports::NodeReader;

/// Load the node stored under `prefix || hash` and check it against `hash`.
pub fn load_node<S: NodeReader + ?Sized>(
    source: &S,
    prefix: &[u8],
    hash: &Hash,
) -> Result<TrieNode, TrieError> {
    let bytes = load_node_bytes(source, prefix, hash)?;
    TrieNode::decode(&bytes)
}

/// Raw bytes of the node under `prefix || hash`, hash-checked but not decoded.
pub fn load_node_bytes<S: NodeReader + ?Sized>(
    source: &S,
    prefix: &[u8],
    hash: &Hash,
) -> Result<Vec<u8>, TrieError> {
    let bytes = source
        .get_node(&node_key(prefix, hash))?
        .ok_or(TrieError::MissingNode(*hash))?;

    let actual = keccak256(&bytes);
    if actual != *hash {
        return Err(TrieError::HashMismatch {
            expected: *hash,
            actual,
        });
    }
    Ok(bytes)
}

/// Read-only handle on one trie, bound to a root and a namespace prefix.
///
/// Opening decodes the root node once; lookups then fetch the remaining
/// nodes from whichever source is passed in. The handle itself holds no
/// reference to the source, so a source that keeps growing (a light
/// client's proof cache) serves later lookups without rebuilding.
#[derive(Clone, Debug)]
pub struct VerifiedTrie {
    root: Hash,
    prefix: Vec<u8>,
    root_node: TrieNode,
}

impl VerifiedTrie {
    /// Open the trie under `root`. Fails if the root node is missing,
    /// does not match `root`, or cannot be decoded.
    pub fn open<S: NodeReader + ?Sized>(
        root: Hash,
        prefix: &[u8],
        source: &S,
    ) -> Result<Self, TrieError> {
        let root_node = if root == EMPTY_TRIE_ROOT {
            TrieNode::Empty
        } else {
            load_node(source, prefix, &root)?
        };

        Ok(Self {
            root,
            prefix: prefix.to_vec(),
            root_node,
        })
    }

    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Look up `key`.
    ///
    /// `Ok(None)` means the nodes prove the key is absent. Any node missing
    /// from `source` along the path is an error, not an absence.
    pub fn get<S: NodeReader + ?Sized>(
        &self,
        source: &S,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>, TrieError> {
        let path = Nibbles::from_bytes(key);
        let mut depth = 0;

        let mut next = match self.root_node.step(&path, &mut depth) {
            Step::Value(value) => return Ok(Some(value.to_vec())),
            Step::Absent => return Ok(None),
            Step::Descend(child) => child,
        };

        for _ in 0..MAX_TRIE_DEPTH {
            let node = load_node(source, &self.prefix, &next)?;
            next = match node.step(&path, &mut depth) {
                Step::Value(value) => return Ok(Some(value.to_vec())),
                Step::Absent => return Ok(None),
                Step::Descend(child) => child,
            };
        }

        Err(TrieError::DepthExceeded {
            max: MAX_TRIE_DEPTH,
        })
    }
}
