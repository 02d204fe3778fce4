//! # qc-04-state-trie
//!
//! Read-only access to the Patricia Merkle Trie used for account state and
//! contract storage.
//!
//! ## Role in System
//!
//! - **Node codec**: RLP + hex-prefix encoding of the four MPT node kinds
//! - **Verified reads**: [`VerifiedTrie`] resolves `key -> value` under a
//!   state root, checking every node it loads against its Keccak256 hash
//! - **Proof collection**: full nodes gather the nodes on the path from the
//!   root to a key with [`collect_proof`], which is exactly what a light
//!   client needs to repeat the same walk
//! - **Snapshots**: [`build_trie`] materializes a whole trie from key/value
//!   pairs on the full node side
//!
//! ## Namespaces
//!
//! Several tries share one node source. Every node is stored under
//! `prefix || hash`, so the state trie and contract storage tries never
//! collide even when their raw keys are identical.
//!
//! ```text
//! NodeReader ──get_node(prefix||hash)──→ bytes ──keccak check──→ TrieNode
//!      ↑                                                            │
//!      └──────────────────── Step::Descend(child) ←─────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
