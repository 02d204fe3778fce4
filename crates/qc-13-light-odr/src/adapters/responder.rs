//! Local Proof Responder
//!
//! Implements `ProofProvider` on top of a full node's trie database.

use crate::domain::{OdrRequest, OdrResponse};
use crate::ports::outbound::ProofProvider;
use qc_04_state_trie::{collect_proof, NodeReader, TrieError};
use std::sync::Arc;
use tracing::debug;

/// Answers proof requests from a complete node source.
///
/// Requests carry no namespace, so a responder serves exactly one trie
/// namespace, fixed at construction.
pub struct LocalProofResponder<S: NodeReader> {
    source: Arc<S>,
    prefix: Vec<u8>,
}

impl<S: NodeReader> LocalProofResponder<S> {
    /// Create a responder serving the trie namespace `prefix`.
    pub fn new(source: Arc<S>, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            source,
            prefix: prefix.into(),
        }
    }
}

impl<S: NodeReader> ProofProvider for LocalProofResponder<S> {
    fn prove(&self, request: &OdrRequest) -> OdrResponse {
        match collect_proof(&*self.source, request.root, &self.prefix, &request.key) {
            Ok(nodes) => {
                debug!(nodes = nodes.len(), "[qc-13] Serving proof");
                OdrResponse::with_proof(nodes.into())
            }
            Err(TrieError::MissingNode(hash)) if hash == request.root => {
                OdrResponse::with_error(format!("unknown state root {}", hex::encode(hash)))
            }
            Err(err) => {
                debug!(error = %err, "[qc-13] Cannot prove key");
                OdrResponse::with_error(err.to_string())
            }
        }
    }
}
