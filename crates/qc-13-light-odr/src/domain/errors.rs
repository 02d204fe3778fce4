//! # Domain Errors
//!
//! Error types for light client on-demand retrieval.
//!
//! Everything except [`OdrError::UnsupportedOperation`] is a per-call
//! failure: a view reports it as "not found" and stays usable.

use qc_04_state_trie::TrieError;
use thiserror::Error;

/// Hash type alias (32-byte Keccak256)
pub type Hash = qc_04_state_trie::Hash;

/// Failure of the messaging substrate to complete a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No reply within the configured timeout.
    #[error("Request timed out after {ms}ms")]
    Timeout {
        /// Timeout that elapsed
        ms: u64,
    },

    /// The peer went away before replying.
    #[error("Peer disconnected")]
    Disconnected,

    /// The reply could not be decoded or did not belong to the request.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A proof that contradicts data the view already trusts, or that is
/// unusable as a proof at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// A node key already cached was presented with different bytes.
    #[error("Proof redefines cached node {key}")]
    ConflictingNode {
        /// Hex store key of the node
        key: String,
    },

    /// Node bytes do not hash to the hash named by their store key.
    #[error("Proof node {key} does not match its hash")]
    HashMismatch {
        /// Hex store key of the node
        key: String,
    },

    /// A proof key is not a hex-encoded store key.
    #[error("Proof key is not hex: {0}")]
    MalformedKey(String),

    /// The proof holds more nodes than any honest proof could.
    #[error("Proof too large: {nodes} nodes > {max}")]
    ProofTooLarge {
        /// Nodes in the proof
        nodes: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Light client ODR error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OdrError {
    /// Round trip to the peer failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The peer answered with an explicit refusal.
    #[error("Peer rejected request: {0}")]
    PeerRejected(String),

    /// The proof contradicts trusted data. Possibly a malicious peer.
    #[error("Proof verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// The trie could not be opened from the cached nodes yet.
    #[error("Trie construction failed: {0}")]
    Construction(TrieError),

    /// A node on the path to the key is missing or invalid.
    #[error("Trie lookup failed: {0}")]
    Lookup(TrieError),

    /// A write operation was invoked on a read-only view.
    #[error("Unsupported operation on read-only view: {0}")]
    UnsupportedOperation(&'static str),
}

impl OdrError {
    /// Stable label for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            OdrError::Transport(_) => "transport",
            OdrError::PeerRejected(_) => "peer_rejected",
            OdrError::Verification(_) => "verification",
            OdrError::Construction(_) => "construction",
            OdrError::Lookup(_) => "lookup",
            OdrError::UnsupportedOperation(_) => "unsupported_operation",
        }
    }

    /// True when the error reveals a bug in the caller rather than a
    /// network or peer condition.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, OdrError::UnsupportedOperation(_))
    }
}
