//! # Proof Messages
//!
//! The proof set and the request/response pair exchanged with full peers.

use super::errors::{Hash, OdrError, TransportError};
use qc_04_state_trie::ProofNodes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trie nodes proving one key's value or absence under one root.
///
/// Keys are hex-encoded store keys (`prefix || hash`); values are the RLP
/// node bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofSet(ProofNodes);

impl ProofSet {
    /// Create an empty proof set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node (builder pattern).
    pub fn with_node(mut self, key: impl Into<String>, data: Vec<u8>) -> Self {
        self.0.insert(key.into(), data);
        self
    }

    /// Node bytes under a hex store key.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Iterate over `(hex key, node bytes)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.0.iter()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the proof holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove a node, returning the remaining proof.
    pub fn without(mut self, key: &str) -> Self {
        self.0.remove(key);
        self
    }
}

impl From<ProofNodes> for ProofSet {
    fn from(nodes: ProofNodes) -> Self {
        Self(nodes)
    }
}

/// Proof query for one key under one state root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OdrRequest {
    /// State root the key is resolved under.
    pub root: Hash,
    /// Raw key bytes.
    pub key: Vec<u8>,
}

impl OdrRequest {
    /// Create a new request.
    pub fn new(root: Hash, key: &[u8]) -> Self {
        Self {
            root,
            key: key.to_vec(),
        }
    }
}

/// Peer reply to an [`OdrRequest`].
///
/// Exactly one of `proof` (non-empty or empty) and `error` is meaningful:
/// a peer that sets `error` must leave `proof` empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OdrResponse {
    /// Proof nodes.
    pub proof: ProofSet,
    /// Why the peer would not answer.
    pub error: Option<String>,
}

impl OdrResponse {
    /// Successful reply.
    pub fn with_proof(proof: ProofSet) -> Self {
        Self { proof, error: None }
    }

    /// Refusal.
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            proof: ProofSet::new(),
            error: Some(message.into()),
        }
    }

    /// Split the reply into a proof or the failure it reports.
    pub fn into_result(self) -> Result<ProofSet, OdrError> {
        match self.error {
            Some(message) if !self.proof.is_empty() => Err(TransportError::Malformed(format!(
                "response carries both an error ({message}) and {} proof nodes",
                self.proof.len()
            ))
            .into()),
            Some(message) => Err(OdrError::PeerRejected(message)),
            None => Ok(self.proof),
        }
    }
}

/// Correlation wrapper for messages crossing a transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OdrEnvelope<T> {
    /// Id echoed by the peer in its reply.
    pub request_id: Uuid,
    /// Wrapped message.
    pub payload: T,
}

impl<T> OdrEnvelope<T> {
    /// Wrap `payload` under a fresh id.
    pub fn new(payload: T) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            payload,
        }
    }

    /// Wrap a reply under the id of the request it answers.
    pub fn reply_to(request_id: Uuid, payload: T) -> Self {
        Self {
            request_id,
            payload,
        }
    }
}
