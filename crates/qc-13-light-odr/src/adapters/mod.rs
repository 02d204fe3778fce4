//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process transport for proof requests and the full node responder.

mod channel;
mod responder;

pub use channel::{ChannelDispatcher, InboundFrame, PeerEndpoint, ProofServer};
pub use responder::LocalProofResponder;
