//! # Adversarial Peers
//!
//! Full nodes that lie. Whatever a peer sends, a view must either return
//! the value committed to by its root or report "not found"; a rejected
//! proof must leave the view's cache exactly as it was.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use qc_04_state_trie::{keccak256, proof_key, InMemoryNodeDb, TrieNode, STATE_TRIE_PREFIX};
    use qc_13_light_odr::{
        LocalProofResponder, OdrConfig, OdrError, OdrRequest, OdrResponse, ProofProvider,
        ProofSet, TransportError, VerificationError,
    };

    use crate::support::{init_tracing, sample_accounts, serve_with, FullNode};

    // =============================================================================
    // LYING PROVIDERS
    // =============================================================================

    /// Replace the leaf of an honest proof with one carrying another value,
    /// keeping the key it was filed under.
    fn forge_leaf(proof: ProofSet, value: &[u8]) -> ProofSet {
        let mut forged = ProofSet::new();
        for (key, bytes) in proof.iter() {
            let bytes = match TrieNode::decode(bytes) {
                Ok(TrieNode::Leaf { path, .. }) => TrieNode::Leaf {
                    path,
                    value: value.to_vec(),
                }
                .rlp_encode(),
                _ => bytes.clone(),
            };
            forged = forged.with_node(key.clone(), bytes);
        }
        forged
    }

    /// Honest until `lying` is set, then forges leaves.
    struct TurncoatProvider {
        honest: LocalProofResponder<InMemoryNodeDb>,
        lying: AtomicBool,
    }

    impl ProofProvider for TurncoatProvider {
        fn prove(&self, request: &OdrRequest) -> OdrResponse {
            let response = self.honest.prove(request);
            if !self.lying.load(Ordering::SeqCst) || response.error.is_some() {
                return response;
            }
            OdrResponse::with_proof(forge_leaf(response.proof, b"1000000"))
        }
    }

    /// Pads honest proofs with `junk` unrelated, correctly hashed nodes.
    struct PaddingProvider {
        honest: LocalProofResponder<InMemoryNodeDb>,
        junk: usize,
    }

    impl ProofProvider for PaddingProvider {
        fn prove(&self, request: &OdrRequest) -> OdrResponse {
            let mut proof = self.honest.prove(request).proof;
            for i in 0..self.junk {
                let data = (i as u64).to_be_bytes().to_vec();
                proof = proof.with_node(proof_key(STATE_TRIE_PREFIX, &keccak256(&data)), data);
            }
            OdrResponse::with_proof(proof)
        }
    }

    /// Sends a proof and an error at once.
    struct ConfusedProvider {
        honest: LocalProofResponder<InMemoryNodeDb>,
    }

    impl ProofProvider for ConfusedProvider {
        fn prove(&self, request: &OdrRequest) -> OdrResponse {
            OdrResponse {
                proof: self.honest.prove(request).proof,
                error: Some("trust me".to_string()),
            }
        }
    }

    fn full_node() -> FullNode {
        FullNode::with_state(sample_accounts(50)).unwrap()
    }

    // =============================================================================
    // TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_forged_leaf_never_yields_a_value() {
        init_tracing();
        let node = full_node();
        let provider = Arc::new(TurncoatProvider {
            honest: node.responder(),
            lying: AtomicBool::new(true),
        });
        let (backend, _server) = serve_with(provider, OdrConfig::for_testing());
        let view = backend.state_view(node.state_root);

        let err = view.try_get(b"account-0007").await.unwrap_err();
        assert!(matches!(
            err,
            OdrError::Verification(VerificationError::HashMismatch { .. })
        ));
        assert_eq!(view.get(b"account-0007").await, None);
        assert_eq!(view.stats().found, 0);
        assert_eq!(view.cached_nodes(), 0);
    }

    #[tokio::test]
    async fn test_hostile_first_answer_does_not_poison_view() {
        init_tracing();
        let node = full_node();
        let provider = Arc::new(TurncoatProvider {
            honest: node.responder(),
            lying: AtomicBool::new(true),
        });
        let (backend, _server) = serve_with(provider.clone(), OdrConfig::for_testing());
        let view = backend.state_view(node.state_root);

        assert_eq!(view.get(b"account-0007").await, None);
        assert_eq!(view.stats().verification_failures, 1);

        provider.lying.store(false, Ordering::SeqCst);
        let balance = 1_007u64.to_be_bytes().to_vec();
        for _ in 0..3 {
            assert_eq!(view.try_get(b"account-0007").await, Ok(Some(balance.clone())));
        }
        assert_eq!(view.stats().verification_failures, 1);
    }

    #[tokio::test]
    async fn test_peer_turning_hostile_cannot_rewrite_cache() {
        init_tracing();
        let node = full_node();
        let provider = Arc::new(TurncoatProvider {
            honest: node.responder(),
            lying: AtomicBool::new(false),
        });
        let (backend, _server) = serve_with(provider.clone(), OdrConfig::for_testing());
        let view = backend.state_view(node.state_root);

        let balance = 1_007u64.to_be_bytes().to_vec();
        assert_eq!(view.get(b"account-0007").await, Some(balance.clone()));
        let cached = view.cached_nodes();

        provider.lying.store(true, Ordering::SeqCst);
        let err = view.try_get(b"account-0007").await.unwrap_err();
        assert!(matches!(
            err,
            OdrError::Verification(VerificationError::ConflictingNode { .. })
        ));
        assert_eq!(view.cached_nodes(), cached);
        assert_eq!(view.stats().verification_failures, 1);

        provider.lying.store(false, Ordering::SeqCst);
        assert_eq!(view.get(b"account-0007").await, Some(balance));
    }

    #[tokio::test]
    async fn test_oversized_proof_is_dropped_before_caching() {
        init_tracing();
        let node = full_node();
        let config = OdrConfig::for_testing();
        let provider = Arc::new(PaddingProvider {
            honest: node.responder(),
            junk: config.max_proof_nodes,
        });
        let (backend, _server) = serve_with(provider, config);
        let view = backend.state_view(node.state_root);

        let err = view.try_get(b"account-0001").await.unwrap_err();
        assert!(matches!(
            err,
            OdrError::Verification(VerificationError::ProofTooLarge { .. })
        ));
        assert_eq!(view.cached_nodes(), 0);
        assert!(!view.is_built());
    }

    #[tokio::test]
    async fn test_unrelated_extra_nodes_do_not_break_reads() {
        init_tracing();
        let node = full_node();
        let provider = Arc::new(PaddingProvider {
            honest: node.responder(),
            junk: 4,
        });
        let (backend, _server) = serve_with(provider, OdrConfig::for_testing());
        let view = backend.state_view(node.state_root);

        assert_eq!(
            view.get(b"account-0042").await,
            Some(1_042u64.to_be_bytes().to_vec())
        );
        assert_eq!(view.get(b"account-0043").await, Some(1_043u64.to_be_bytes().to_vec()));
    }

    #[tokio::test]
    async fn test_error_with_proof_is_malformed() {
        init_tracing();
        let node = full_node();
        let provider = Arc::new(ConfusedProvider {
            honest: node.responder(),
        });
        let (backend, _server) = serve_with(provider, OdrConfig::for_testing());
        let view = backend.state_view(node.state_root);

        assert!(matches!(
            view.try_get(b"account-0003").await,
            Err(OdrError::Transport(TransportError::Malformed(_)))
        ));
        assert_eq!(view.cached_nodes(), 0);
    }
}
