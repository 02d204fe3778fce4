//! # ODR Integration Flows
//!
//! A light client backend reading state from a full node through the
//! channel transport:
//!
//! ```text
//! VerifiedView → ProofFetcher → ChannelDispatcher ══ bincode ══ ProofServer → LocalProofResponder
//! ```
//!
//! Covers the known-key, absent-key and failed-transport flows plus view
//! isolation and the per-view counters.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use qc_04_state_trie::{build_trie, InMemoryNodeDb, EMPTY_TRIE_ROOT, STATE_TRIE_PREFIX};
    use qc_13_light_odr::{
        ChannelDispatcher, LocalProofResponder, OdrBackend, OdrConfig, OdrError, ProofServer,
        StateTrieApi, TransportError,
    };

    use crate::support::{init_tracing, sample_accounts, serve_with, FullNode};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn ledger() -> Vec<(Vec<u8>, Vec<u8>)> {
        vec![
            (b"alice".to_vec(), b"100".to_vec()),
            (b"carol".to_vec(), b"7".to_vec()),
            (b"dave".to_vec(), b"3".to_vec()),
        ]
    }

    fn full_node() -> FullNode {
        FullNode::with_state(ledger()).unwrap()
    }

    // =============================================================================
    // KNOWN / ABSENT KEYS
    // =============================================================================

    #[tokio::test]
    async fn test_known_key_is_found() {
        init_tracing();
        let node = full_node();
        let (backend, _server) = node.serve(OdrConfig::for_testing());

        let view = backend.state_view(node.state_root);
        assert_eq!(view.get(b"alice").await, Some(b"100".to_vec()));
        assert!(view.is_built());
    }

    #[tokio::test]
    async fn test_absent_key_is_not_found() {
        init_tracing();
        let node = full_node();
        let (backend, _server) = node.serve(OdrConfig::for_testing());

        let view = backend.state_view(node.state_root);
        assert_eq!(view.try_get(b"bob").await, Ok(None));
        assert_eq!(view.get(b"bob").await, None);

        let stats = view.stats();
        assert_eq!(stats.not_found, 2);
        assert_eq!(stats.failures(), 0);
    }

    #[tokio::test]
    async fn test_empty_trie_proves_everything_absent() {
        init_tracing();
        let node = FullNode::with_state(Vec::<(Vec<u8>, Vec<u8>)>::new()).unwrap();
        assert_eq!(node.state_root, EMPTY_TRIE_ROOT);
        let (backend, _server) = node.serve(OdrConfig::for_testing());

        let view = backend.state_view(node.state_root);
        assert_eq!(view.try_get(b"alice").await, Ok(None));
        assert_eq!(view.cached_nodes(), 0);
    }

    #[tokio::test]
    async fn test_unknown_root_is_rejected_by_peer() {
        init_tracing();
        let node = full_node();
        let (backend, _server) = node.serve(OdrConfig::for_testing());

        let view = backend.state_view([0x42; 32]);
        let err = view.try_get(b"alice").await.unwrap_err();
        assert!(matches!(err, OdrError::PeerRejected(ref msg) if msg.contains("unknown state root")));
        assert_eq!(view.get(b"alice").await, None);
        assert_eq!(view.stats().peer_rejections, 2);
    }

    // =============================================================================
    // TRANSPORT FAILURE AND RECOVERY
    // =============================================================================

    #[tokio::test]
    async fn test_disconnect_then_recovery() {
        init_tracing();
        let node = full_node();
        let config = OdrConfig::for_testing();
        let (dispatcher, mut endpoint) = ChannelDispatcher::connect("flaky-node", &config);

        // Drop the first request's reply slot, then serve normally.
        let server = ProofServer::new(Arc::new(node.responder()));
        let server_task = tokio::spawn(async move {
            if let Some(frame) = endpoint.next_frame().await {
                drop(frame);
            }
            server.serve(endpoint).await
        });

        let backend = OdrBackend::new(dispatcher, config);
        let view = backend.state_view(node.state_root);

        assert_eq!(
            view.try_get(b"carol").await,
            Err(OdrError::Transport(TransportError::Disconnected))
        );
        assert!(!view.is_built());
        assert_eq!(view.cached_nodes(), 0);

        assert_eq!(view.get(b"alice").await, Some(b"100".to_vec()));
        assert!(view.is_built());

        drop(view);
        drop(backend);
        assert_eq!(server_task.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_dead_peer_reads_as_not_found() {
        init_tracing();
        let node = full_node();
        let config = OdrConfig::for_testing();
        let (dispatcher, endpoint) = ChannelDispatcher::connect("dead-node", &config);
        drop(endpoint);

        let backend = OdrBackend::new(dispatcher, config);
        let view = backend.state_view(node.state_root);
        assert_eq!(view.get(b"alice").await, None);
        assert_eq!(view.stats().transport_failures, 1);
    }

    #[tokio::test]
    async fn test_slow_peer_times_out() {
        init_tracing();
        let node = full_node();
        let config = OdrConfig {
            request_timeout_ms: 30,
            ..OdrConfig::for_testing()
        };
        let (dispatcher, mut endpoint) = ChannelDispatcher::connect("slow-node", &config);
        let responder = Arc::new(node.responder());
        tokio::spawn(async move {
            let server = ProofServer::new(responder);
            while let Some(frame) = endpoint.next_frame().await {
                tokio::time::sleep(Duration::from_millis(200)).await;
                if let Ok(reply) = server.handle_frame(&frame.bytes) {
                    frame.respond(reply);
                }
            }
        });

        let backend = OdrBackend::new(dispatcher, config);
        let view = backend.state_view(node.state_root);
        assert_eq!(
            view.try_get(b"alice").await,
            Err(OdrError::Transport(TransportError::Timeout { ms: 30 }))
        );
        assert!(!view.is_built());
    }

    // =============================================================================
    // LARGER STATE
    // =============================================================================

    #[tokio::test]
    async fn test_reads_across_large_state() {
        init_tracing();
        let accounts = sample_accounts(300);
        let node = FullNode::with_state(accounts.clone()).unwrap();
        let (backend, _server) = node.serve(OdrConfig::default());
        let view = backend.state_view(node.state_root);

        let mut last_cached = 0;
        for (key, value) in accounts.iter().step_by(7) {
            assert_eq!(view.get(key).await, Some(value.clone()));
            // Append-only: the cache never shrinks.
            assert!(view.cached_nodes() >= last_cached);
            last_cached = view.cached_nodes();
        }

        assert_eq!(view.get(b"account-9999").await, None);
        let stats = view.stats();
        assert_eq!(stats.found, 43);
        assert_eq!(stats.not_found, 1);
        assert_eq!(stats.fetches, 44);
    }

    #[tokio::test]
    async fn test_repeated_get_fetches_each_time() {
        init_tracing();
        let node = full_node();
        let (backend, server) = node.serve(OdrConfig::for_testing());
        let view = backend.state_view(node.state_root);

        for _ in 0..3 {
            assert_eq!(view.get(b"dave").await, Some(b"3".to_vec()));
        }
        assert_eq!(view.stats().fetches, 3);

        drop(view);
        drop(backend);
        assert_eq!(server.await.unwrap(), 3);
    }

    // =============================================================================
    // ISOLATION
    // =============================================================================

    #[tokio::test]
    async fn test_views_over_different_roots_are_isolated() {
        init_tracing();
        let db = Arc::new(InMemoryNodeDb::new());
        let old_root = build_trie(db.as_ref(), STATE_TRIE_PREFIX, ledger()).unwrap();
        let mut updated = ledger();
        updated[0].1 = b"250".to_vec();
        updated.push((b"erin".to_vec(), b"1".to_vec()));
        let new_root = build_trie(db.as_ref(), STATE_TRIE_PREFIX, updated).unwrap();
        assert_ne!(old_root, new_root);

        let responder = Arc::new(LocalProofResponder::new(db, STATE_TRIE_PREFIX));
        let (backend, _server) = serve_with(responder, OdrConfig::default());
        let old_view = Arc::new(backend.state_view(old_root));
        let new_view = Arc::new(backend.state_view(new_root));

        let mut tasks = Vec::new();
        for round in 0..10 {
            let old_view = old_view.clone();
            let new_view = new_view.clone();
            tasks.push(tokio::spawn(async move {
                let key: &[u8] = if round % 2 == 0 { b"alice" } else { b"erin" };
                tokio::join!(old_view.get(key), new_view.get(key))
            }));
        }

        for (round, task) in tasks.into_iter().enumerate() {
            let (old, new) = task.await.unwrap();
            if round % 2 == 0 {
                assert_eq!(old, Some(b"100".to_vec()));
                assert_eq!(new, Some(b"250".to_vec()));
            } else {
                assert_eq!(old, None);
                assert_eq!(new, Some(b"1".to_vec()));
            }
        }

        assert_eq!(old_view.stats().fetches, 10);
        assert_eq!(new_view.stats().fetches, 10);
    }

    #[tokio::test]
    async fn test_trait_object_view_is_read_only() {
        init_tracing();
        let node = full_node();
        let (backend, _server) = node.serve(OdrConfig::for_testing());
        let view: Box<dyn StateTrieApi> = Box::new(backend.state_view(node.state_root));

        assert_eq!(view.get(b"carol").await, Some(b"7".to_vec()));
        let err = view.put(b"carol", b"8").unwrap_err();
        assert_eq!(err, OdrError::UnsupportedOperation("put"));
        assert!(err.is_programmer_error());
        assert_eq!(view.get(b"carol").await, Some(b"7".to_vec()));
    }

    // =============================================================================
    // CONFIGURATION
    // =============================================================================

    #[test]
    fn test_config_from_json() {
        let config: OdrConfig = serde_json::from_str(
            r#"{ "request_timeout_ms": 1500, "max_proof_nodes": 128, "channel_capacity": 16 }"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.max_proof_nodes, 128);

        let json = serde_json::to_string(&OdrConfig::default()).unwrap();
        assert!(json.contains("\"request_timeout_ms\":5000"));
    }
}
