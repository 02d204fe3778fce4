//! # QC-13 Light Client ODR
//!
//! On-Demand Retrieval of state for light clients.
//!
//! **Subsystem ID:** 13
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A light client holds block headers, hence state roots, but no state.
//! To answer "what is the value of key K under root R" it asks a full peer
//! for the trie nodes on the path from R to K, checks them against R, and
//! reads K out of the partial trie they form.
//!
//! ```text
//! caller ──get(key)──→ VerifiedView ──fetch(root, key)──→ ProofFetcher ──dispatch──→ peer
//!                          │                                   │
//!                          │ ←──────────── ProofSet ←──────────┘
//!                          ├── EphemeralStore::merge(proof)
//!                          ├── VerifiedTrie::open(root, prefix, store)   (once)
//!                          └── VerifiedTrie::get(store, key) ──→ value | None
//! ```
//!
//! ## Security Properties
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Hash-checked nodes | Every node must hash to the reference its parent holds |
//! | Append-only cache | A proof may never rewrite a node already accepted |
//! | Atomic merge | A rejected proof leaves the cache untouched |
//! | Bounded proofs | Oversized proofs are dropped before touching any view |
//! | Read-only views | Write operations fail with a distinct error |
//!
//! ## Module Structure
//!
//! ```text
//! qc-13-light-odr/
//! ├── domain/          # ProofSet, wire messages, EphemeralStore, errors, stats
//! ├── ports/           # StateTrieApi (inbound), MessageDispatcher/ProofProvider (outbound)
//! ├── application/     # ProofFetcher, VerifiedView, OdrBackend
//! ├── adapters/        # Channel transport, proof server, local proof responder
//! └── config.rs        # OdrConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{
    ChannelDispatcher, InboundFrame, LocalProofResponder, PeerEndpoint, ProofServer,
};
pub use application::{OdrBackend, ProofFetcher, VerifiedView};
pub use config::OdrConfig;
pub use domain::{
    EphemeralStore, Hash, OdrError, OdrRequest, OdrResponse, ProofSet, TransportError,
    VerificationError, ViewStats, ViewStatsSnapshot,
};
pub use ports::{MessageDispatcher, MockDispatcher, ProofProvider, StateTrieApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
