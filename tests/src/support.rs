//! # Test Support
//!
//! A full node holding a state trie, wired to light clients through the
//! channel transport.

use qc_04_state_trie::{build_trie, Hash, InMemoryNodeDb, TrieError, STATE_TRIE_PREFIX};
use qc_13_light_odr::{
    ChannelDispatcher, LocalProofResponder, OdrBackend, OdrConfig, ProofProvider, ProofServer,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once. Honors `RUST_LOG`, defaults to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// `account-NNNN -> balance` pairs.
pub fn sample_accounts(count: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    (0..count)
        .map(|i| {
            (
                format!("account-{:04}", i).into_bytes(),
                (1_000 + i as u64).to_be_bytes().to_vec(),
            )
        })
        .collect()
}

/// Full node with a complete state trie.
pub struct FullNode {
    /// Node database.
    pub db: Arc<InMemoryNodeDb>,
    /// Root of the state trie.
    pub state_root: Hash,
}

impl FullNode {
    /// Build the state trie from `accounts`.
    pub fn with_state<I>(accounts: I) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let db = Arc::new(InMemoryNodeDb::new());
        let state_root = build_trie(db.as_ref(), STATE_TRIE_PREFIX, accounts)?;
        Ok(Self { db, state_root })
    }

    /// Honest proof responder over the state namespace.
    pub fn responder(&self) -> LocalProofResponder<InMemoryNodeDb> {
        LocalProofResponder::new(self.db.clone(), STATE_TRIE_PREFIX)
    }

    /// Serve proofs to a fresh light client backend.
    pub fn serve(&self, config: OdrConfig) -> (OdrBackend<ChannelDispatcher>, JoinHandle<u64>) {
        serve_with(Arc::new(self.responder()), config)
    }
}

/// Serve proofs from any provider to a fresh light client backend.
pub fn serve_with<P: ProofProvider + 'static>(
    provider: Arc<P>,
    config: OdrConfig,
) -> (OdrBackend<ChannelDispatcher>, JoinHandle<u64>) {
    let (dispatcher, endpoint) = ChannelDispatcher::connect("full-node-1", &config);
    let server = ProofServer::new(provider).spawn(endpoint);
    (OdrBackend::new(dispatcher, config), server)
}
