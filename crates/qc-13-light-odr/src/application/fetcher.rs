//! # Proof Fetcher
//!
//! One proof request, one attempt. No retries, no caching and no peer
//! selection; those belong to whoever owns the dispatcher.

use crate::config::OdrConfig;
use crate::domain::{Hash, OdrError, OdrRequest, ProofSet, VerificationError};
use crate::ports::MessageDispatcher;
use tracing::debug;

/// Requests proofs through a [`MessageDispatcher`].
///
/// Holds no per-view state, so a single fetcher can serve any number of
/// views concurrently.
pub struct ProofFetcher<D: MessageDispatcher> {
    dispatcher: D,
    max_proof_nodes: usize,
}

impl<D: MessageDispatcher> ProofFetcher<D> {
    /// Create a fetcher over `dispatcher`.
    pub fn new(dispatcher: D, config: &OdrConfig) -> Self {
        Self {
            dispatcher,
            max_proof_nodes: config.max_proof_nodes,
        }
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Fetch the proof for `key` under `root`.
    ///
    /// Transport failures, peer refusals and oversized proofs are kept
    /// apart in the returned error.
    pub async fn fetch(&self, root: Hash, key: &[u8]) -> Result<ProofSet, OdrError> {
        debug!(
            "[qc-13] Requesting proof for key {} under root {} from {}",
            hex::encode(key),
            hex::encode(root),
            self.dispatcher.peer_id()
        );

        let response = self
            .dispatcher
            .dispatch(OdrRequest::new(root, key))
            .await?;
        let proof = response.into_result()?;

        if proof.len() > self.max_proof_nodes {
            return Err(VerificationError::ProofTooLarge {
                nodes: proof.len(),
                max: self.max_proof_nodes,
            }
            .into());
        }

        debug!(nodes = proof.len(), "[qc-13] Received proof");
        Ok(proof)
    }
}
