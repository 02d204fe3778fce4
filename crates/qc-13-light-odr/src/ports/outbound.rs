//! # Outbound Ports
//!
//! Traits for external dependencies (the messaging substrate and the full
//! node side that answers proof requests).

use crate::domain::{OdrRequest, OdrResponse, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Message dispatcher - outbound port.
///
/// Performs one request/response round trip with a full peer. Timeouts are
/// the dispatcher's business; callers never retry.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Send a proof request and wait for the reply.
    async fn dispatch(&self, request: OdrRequest) -> Result<OdrResponse, TransportError>;

    /// Peer identifier (for logging/debugging).
    fn peer_id(&self) -> &str;
}

/// Proof provider - outbound port implemented on the full node side.
pub trait ProofProvider: Send + Sync {
    /// Answer a proof request. Refusals go in [`OdrResponse::error`].
    fn prove(&self, request: &OdrRequest) -> OdrResponse;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Scripted dispatcher for testing.
///
/// Replies are served from the script first. Once it runs dry, requests go
/// to the fallback provider if one is set, otherwise they fail with
/// [`TransportError::Disconnected`].
#[derive(Default)]
pub struct MockDispatcher {
    script: Mutex<VecDeque<Result<OdrResponse, TransportError>>>,
    fallback: Option<Arc<dyn ProofProvider>>,
    requests: Mutex<Vec<OdrRequest>>,
    calls: AtomicUsize,
}

impl MockDispatcher {
    /// Dispatcher with an empty script and no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher that answers everything from `provider`.
    pub fn with_provider(provider: Arc<dyn ProofProvider>) -> Self {
        Self {
            fallback: Some(provider),
            ..Self::default()
        }
    }

    /// Queue a reply.
    pub fn push_response(&self, response: OdrResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    /// Number of `dispatch` calls so far.
    pub fn dispatch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<OdrRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl MessageDispatcher for MockDispatcher {
    async fn dispatch(&self, request: OdrRequest) -> Result<OdrResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if let Some(scripted) = self.script.lock().pop_front() {
            return scripted;
        }
        match &self.fallback {
            Some(provider) => Ok(provider.prove(&request)),
            None => Err(TransportError::Disconnected),
        }
    }

    fn peer_id(&self) -> &str {
        "mock-peer"
    }
}
