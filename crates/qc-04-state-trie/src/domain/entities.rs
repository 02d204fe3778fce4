//! # Core Trie Types
//!
//! Hash aliases, canonical constants and the store-key layout shared by
//! full nodes and light clients.

use super::rlp::keccak256;
use std::collections::HashMap;

pub type Hash = [u8; 32];

/// Keccak256 hash of an empty RLP-encoded trie.
/// Value: keccak256(RLP("")) = 0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421
pub const EMPTY_TRIE_ROOT: Hash = [
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
];

/// Upper bound on nodes visited by a single walk.
///
/// Every honest step consumes at least one nibble, so this only trips on
/// hostile node sets.
pub const MAX_TRIE_DEPTH: usize = 256;

/// Namespace of the account state trie.
pub const STATE_TRIE_PREFIX: &[u8] = b"S";

/// Namespace of contract storage tries.
pub const STORAGE_TRIE_PREFIX: &[u8] = b"C";

/// Proof nodes keyed by hex-encoded store key (`prefix || hash`).
pub type ProofNodes = HashMap<String, Vec<u8>>;

/// Store key of a node: namespace prefix followed by the node hash.
pub fn node_key(prefix: &[u8], hash: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + hash.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(hash);
    key
}

/// Hex form of [`node_key`], as carried in proofs.
pub fn proof_key(prefix: &[u8], hash: &Hash) -> String {
    hex::encode(node_key(prefix, hash))
}

/// Whether `data` may be stored under `key`: the last 32 bytes of a store
/// key are the Keccak256 hash of the node encoding.
pub fn node_matches_key(key: &[u8], data: &[u8]) -> bool {
    key.len() >= 32 && key[key.len() - 32..] == keccak256(data)
}
