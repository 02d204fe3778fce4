//! # Proof Collection
//!
//! Full-node side of on-demand retrieval: gather every node on the path from
//! a root towards a key. The result proves the key's value, or proves its
//! absence by ending at the node where the path diverges.
//!
//! A light client that replays [`VerifiedTrie::get`](super::VerifiedTrie::get)
//! over the returned nodes visits exactly the same nodes.

use super::reader::load_node_bytes;
use super::{proof_key, Hash, Nibbles, ProofNodes, Step, TrieError, TrieNode, EMPTY_TRIE_ROOT, MAX_TRIE_DEPTH};
use crate::ports::NodeReader;

/// Collect the proof for `key` under `root` from a complete node source.
///
/// Errors if the source lacks any node on the path; a full node that cannot
/// produce a complete proof must say so rather than hand out a partial one.
pub fn collect_proof<S: NodeReader + ?Sized>(
    source: &S,
    root: Hash,
    prefix: &[u8],
    key: &[u8],
) -> Result<ProofNodes, TrieError> {
    let mut proof = ProofNodes::new();
    if root == EMPTY_TRIE_ROOT {
        return Ok(proof);
    }

    let path = Nibbles::from_bytes(key);
    let mut depth = 0;
    let mut next = root;

    for _ in 0..=MAX_TRIE_DEPTH {
        let bytes = load_node_bytes(source, prefix, &next)?;
        let node = TrieNode::decode(&bytes)?;
        proof.insert(proof_key(prefix, &next), bytes);

        match node.step(&path, &mut depth) {
            Step::Value(_) | Step::Absent => return Ok(proof),
            Step::Descend(child) => next = child,
        }
    }

    Err(TrieError::DepthExceeded {
        max: MAX_TRIE_DEPTH,
    })
}
