//! # Verified View
//!
//! Read-only state trie view for one `(root, prefix)`, backed by proofs
//! fetched on demand.
//!
//! ## Query Flow
//!
//! ```text
//! get(key) ──fetch (no lock)──→ proof
//!                                 │
//!          ┌──────── lock ────────┴───────────────────────┐
//!          │ merge → open trie if absent → walk from root │
//!          └──────────────────────────────────────────────┘
//! ```
//!
//! Every `get` fetches, even when the nodes are already cached. The fetch
//! runs outside the lock, so dropping an in-flight `get` never leaves a half
//! applied update. Any failure reads as "not found"; the cause goes to the
//! logs and [`ViewStats`].

use crate::domain::{
    EphemeralStore, Hash, OdrError, ProofSet, ViewStats, ViewStatsSnapshot,
};
use crate::ports::{MessageDispatcher, StateTrieApi};
use async_trait::async_trait;
use parking_lot::Mutex;
use qc_04_state_trie::VerifiedTrie;
use std::sync::Arc;
use tracing::{debug, warn};

use super::fetcher::ProofFetcher;

/// Mutable part of a view. Only touched under the view's lock.
#[derive(Default)]
struct ViewState {
    store: EphemeralStore,
    /// Absent until a construction succeeds.
    trie: Option<VerifiedTrie>,
}

/// Light client view over a single state root.
pub struct VerifiedView<D: MessageDispatcher> {
    root: Hash,
    prefix: Vec<u8>,
    fetcher: Arc<ProofFetcher<D>>,
    state: Mutex<ViewState>,
    stats: ViewStats,
}

impl<D: MessageDispatcher> VerifiedView<D> {
    /// Create an empty view. Nothing is fetched until the first `get`.
    pub fn new(root: Hash, prefix: impl Into<Vec<u8>>, fetcher: Arc<ProofFetcher<D>>) -> Self {
        Self {
            root,
            prefix: prefix.into(),
            fetcher,
            state: Mutex::new(ViewState::default()),
            stats: ViewStats::new(),
        }
    }

    /// State root this view resolves keys under.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Namespace prefix of the view's trie.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Query counters.
    pub fn stats(&self) -> ViewStatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of proof nodes cached so far.
    pub fn cached_nodes(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Whether the trie handle has been constructed.
    pub fn is_built(&self) -> bool {
        self.state.lock().trie.is_some()
    }

    /// Value under `key`, or `None` when it is absent or could not be
    /// proven.
    pub async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.try_get(key).await.ok().flatten()
    }

    /// Like [`VerifiedView::get`] but reports why a lookup failed.
    pub async fn try_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, OdrError> {
        self.stats.record_fetch();
        let result = self.resolve(key).await;

        match &result {
            Ok(Some(_)) => self.stats.record_found(),
            Ok(None) => self.stats.record_not_found(),
            Err(err) => {
                self.stats.record_failure(err);
                self.log_failure(key, err);
            }
        }
        result
    }

    async fn resolve(&self, key: &[u8]) -> Result<Option<Vec<u8>>, OdrError> {
        let proof = self.fetcher.fetch(self.root, key).await?;
        self.apply(&proof, key)
    }

    /// Merge, build and walk as one critical section.
    fn apply(&self, proof: &ProofSet, key: &[u8]) -> Result<Option<Vec<u8>>, OdrError> {
        let mut state = self.state.lock();

        let added = state.store.merge(proof)?;
        if added > 0 {
            debug!(nodes = added, "[qc-13] Cached new proof nodes");
        }

        let trie = match state.trie.take() {
            Some(trie) => trie,
            None => VerifiedTrie::open(self.root, &self.prefix, &state.store)
                .map_err(OdrError::Construction)?,
        };
        let value = trie.get(&state.store, key).map_err(OdrError::Lookup);
        state.trie = Some(trie);
        value
    }

    fn log_failure(&self, key: &[u8], err: &OdrError) {
        let root = hex::encode(self.root);
        let key = hex::encode(key);
        match err {
            OdrError::Verification(_) => warn!(
                %root, %key, kind = err.kind(), error = %err,
                "[qc-13] Rejected proof from {}", self.fetcher.dispatcher().peer_id()
            ),
            _ => debug!(
                %root, %key, kind = err.kind(), error = %err,
                "[qc-13] Lookup failed"
            ),
        }
    }

    fn unsupported(&self, operation: &'static str) -> OdrError {
        warn!(
            root = %hex::encode(self.root),
            "[qc-13] {} called on read-only view", operation
        );
        OdrError::UnsupportedOperation(operation)
    }
}

#[async_trait]
impl<D: MessageDispatcher> StateTrieApi for VerifiedView<D> {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        VerifiedView::get(self, key).await
    }

    fn put(&self, _key: &[u8], _value: &[u8]) -> Result<(), OdrError> {
        Err(self.unsupported("put"))
    }

    fn commit(&self) -> Result<Hash, OdrError> {
        Err(self.unsupported("commit"))
    }

    fn delete_prefix(&self, _prefix: &[u8]) -> Result<bool, OdrError> {
        Err(self.unsupported("delete_prefix"))
    }

    fn get_proof(&self, _key: &[u8]) -> Result<ProofSet, OdrError> {
        Err(self.unsupported("get_proof"))
    }

    fn hash(&self) -> Result<Hash, OdrError> {
        Err(self.unsupported("hash"))
    }
}
