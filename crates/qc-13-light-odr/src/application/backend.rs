//! # ODR Backend
//!
//! Factory for verified views. Views created here share the fetcher and
//! nothing else.

use crate::config::OdrConfig;
use crate::domain::Hash;
use crate::ports::MessageDispatcher;
use qc_04_state_trie::{STATE_TRIE_PREFIX, STORAGE_TRIE_PREFIX};
use std::sync::Arc;
use tracing::debug;

use super::fetcher::ProofFetcher;
use super::view::VerifiedView;

/// Light client backend handing out read-only trie views.
pub struct OdrBackend<D: MessageDispatcher> {
    fetcher: Arc<ProofFetcher<D>>,
    config: OdrConfig,
}

impl<D: MessageDispatcher> OdrBackend<D> {
    /// Create a backend over `dispatcher`.
    pub fn new(dispatcher: D, config: OdrConfig) -> Self {
        Self {
            fetcher: Arc::new(ProofFetcher::new(dispatcher, &config)),
            config,
        }
    }

    /// Fresh view over the trie under `root` in namespace `prefix`.
    pub fn view(&self, root: Hash, prefix: &[u8]) -> VerifiedView<D> {
        debug!(
            root = %hex::encode(root),
            prefix = %hex::encode(prefix),
            "[qc-13] Opening verified view"
        );
        VerifiedView::new(root, prefix, self.fetcher.clone())
    }

    /// Fresh view over the account state trie.
    pub fn state_view(&self, root: Hash) -> VerifiedView<D> {
        self.view(root, STATE_TRIE_PREFIX)
    }

    /// Fresh view over a contract storage trie.
    ///
    /// Requests carry no namespace and a peer answers for exactly one, so
    /// this backend must be wired to a peer serving
    /// [`STORAGE_TRIE_PREFIX`]. Against a state peer every read is "not
    /// found".
    pub fn storage_view(&self, root: Hash) -> VerifiedView<D> {
        self.view(root, STORAGE_TRIE_PREFIX)
    }

    /// Shared proof fetcher.
    pub fn fetcher(&self) -> &Arc<ProofFetcher<D>> {
        &self.fetcher
    }

    /// Backend configuration.
    pub fn config(&self) -> &OdrConfig {
        &self.config
    }
}
