//! Channel Transport Adapter
//!
//! Implements `MessageDispatcher` over tokio channels, with a matching
//! `ProofServer` for the peer end.
//!
//! Each request travels as a bincode-encoded [`OdrEnvelope`] together with a
//! oneshot reply slot. The reply must echo the request's correlation id.

use crate::config::OdrConfig;
use crate::domain::{OdrEnvelope, OdrRequest, OdrResponse, TransportError};
use crate::ports::outbound::{MessageDispatcher, ProofProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One encoded request plus the slot its reply goes into.
#[derive(Debug)]
pub struct InboundFrame {
    /// Encoded `OdrEnvelope<OdrRequest>`.
    pub bytes: Vec<u8>,
    reply: oneshot::Sender<Vec<u8>>,
}

impl InboundFrame {
    /// Send the encoded reply. Returns false if the requester gave up.
    pub fn respond(self, bytes: Vec<u8>) -> bool {
        self.reply.send(bytes).is_ok()
    }
}

/// Light client end of an in-process peer link.
pub struct ChannelDispatcher {
    /// Peer identifier.
    peer_id: String,
    /// Outgoing frames.
    sender: mpsc::Sender<InboundFrame>,
    /// Round-trip timeout.
    timeout: Duration,
}

/// Full node end of an in-process peer link.
pub struct PeerEndpoint {
    peer_id: String,
    receiver: mpsc::Receiver<InboundFrame>,
}

impl ChannelDispatcher {
    /// Open a link to a peer, returning both ends.
    pub fn connect(peer_id: impl Into<String>, config: &OdrConfig) -> (Self, PeerEndpoint) {
        let peer_id = peer_id.into();
        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
        (
            Self {
                peer_id: peer_id.clone(),
                sender,
                timeout: config.request_timeout(),
            },
            PeerEndpoint { peer_id, receiver },
        )
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait]
impl MessageDispatcher for ChannelDispatcher {
    async fn dispatch(&self, request: OdrRequest) -> Result<OdrResponse, TransportError> {
        let envelope = OdrEnvelope::new(request);
        let request_id = envelope.request_id;
        let bytes = bincode::serialize(&envelope)
            .map_err(|e| TransportError::Malformed(format!("cannot encode request: {}", e)))?;

        let (reply, rx) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(InboundFrame { bytes, reply })
                .await
                .map_err(|_| TransportError::Disconnected)?;
            debug!(
                request_id = %request_id,
                peer = %self.peer_id,
                "[qc-13] Sent proof request"
            );
            rx.await.map_err(|_| TransportError::Disconnected)
        };

        let reply = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    request_id = %request_id,
                    peer = %self.peer_id,
                    "[qc-13] Proof request timed out"
                );
                return Err(TransportError::Timeout {
                    ms: self.timeout_ms(),
                });
            }
        };

        let envelope: OdrEnvelope<OdrResponse> = bincode::deserialize(&reply)
            .map_err(|e| TransportError::Malformed(format!("cannot decode reply: {}", e)))?;
        if envelope.request_id != request_id {
            return Err(TransportError::Malformed(format!(
                "reply for {} answered request {}",
                envelope.request_id, request_id
            )));
        }
        Ok(envelope.payload)
    }

    fn peer_id(&self) -> &str {
        &self.peer_id
    }
}

impl PeerEndpoint {
    /// Peer identifier.
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    /// Next request, or `None` once every dispatcher is gone.
    pub async fn next_frame(&mut self) -> Option<InboundFrame> {
        self.receiver.recv().await
    }
}

/// Serves proof requests arriving on a [`PeerEndpoint`].
pub struct ProofServer<P: ProofProvider> {
    provider: Arc<P>,
    served: AtomicU64,
}

impl<P: ProofProvider> ProofServer<P> {
    /// Create a server answering from `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            served: AtomicU64::new(0),
        }
    }

    /// Decode one request and encode the provider's reply.
    pub fn handle_frame(&self, bytes: &[u8]) -> Result<Vec<u8>, TransportError> {
        let envelope: OdrEnvelope<OdrRequest> = bincode::deserialize(bytes)
            .map_err(|e| TransportError::Malformed(format!("cannot decode request: {}", e)))?;

        let response = self.provider.prove(&envelope.payload);
        self.served.fetch_add(1, Ordering::Relaxed);

        bincode::serialize(&OdrEnvelope::reply_to(envelope.request_id, response))
            .map_err(|e| TransportError::Malformed(format!("cannot encode reply: {}", e)))
    }

    /// Requests answered so far.
    pub fn served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }

    /// Answer requests until every dispatcher for `endpoint` is dropped.
    ///
    /// Undecodable requests are dropped without a reply, which the sender
    /// sees as a disconnect.
    pub async fn serve(&self, mut endpoint: PeerEndpoint) -> u64 {
        info!("[qc-13] Proof server {} started", endpoint.peer_id());

        while let Some(frame) = endpoint.next_frame().await {
            match self.handle_frame(&frame.bytes) {
                Ok(reply) => {
                    if !frame.respond(reply) {
                        debug!("[qc-13] Requester gave up before the reply");
                    }
                }
                Err(e) => warn!(
                    peer = endpoint.peer_id(),
                    error = %e,
                    "[qc-13] Dropping bad request"
                ),
            }
        }

        info!("[qc-13] Proof server {} stopped", endpoint.peer_id());
        self.served()
    }
}

impl<P: ProofProvider + 'static> ProofServer<P> {
    /// Run [`ProofServer::serve`] on a tokio task.
    pub fn spawn(self, endpoint: PeerEndpoint) -> JoinHandle<u64> {
        tokio::spawn(async move { self.serve(endpoint).await })
    }
}
