//! # View Statistics
//!
//! Per-view counters. `get` collapses every failure into "not found", so
//! these counters (with the logs) are how operators tell the causes apart.

use super::errors::OdrError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one verified view.
#[derive(Debug, Default)]
pub struct ViewStats {
    fetches: AtomicU64,
    found: AtomicU64,
    not_found: AtomicU64,
    transport_failures: AtomicU64,
    peer_rejections: AtomicU64,
    verification_failures: AtomicU64,
    construction_failures: AtomicU64,
    lookup_failures: AtomicU64,
}

/// Point-in-time copy of [`ViewStats`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStatsSnapshot {
    /// Proof requests issued.
    pub fetches: u64,
    /// Lookups that produced a value.
    pub found: u64,
    /// Lookups that proved the key absent.
    pub not_found: u64,
    /// Round trips that failed.
    pub transport_failures: u64,
    /// Explicit peer refusals.
    pub peer_rejections: u64,
    /// Proofs rejected on merge.
    pub verification_failures: u64,
    /// Failed trie constructions.
    pub construction_failures: u64,
    /// Lookups that hit a missing or invalid node.
    pub lookup_failures: u64,
}

impl ViewStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an issued proof request.
    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a lookup that produced a value.
    pub fn record_found(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a lookup that proved absence.
    pub fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed query under its cause.
    pub fn record_failure(&self, error: &OdrError) {
        let counter = match error {
            OdrError::Transport(_) => &self.transport_failures,
            OdrError::PeerRejected(_) => &self.peer_rejections,
            OdrError::Verification(_) => &self.verification_failures,
            OdrError::Construction(_) => &self.construction_failures,
            OdrError::Lookup(_) => &self.lookup_failures,
            OdrError::UnsupportedOperation(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> ViewStatsSnapshot {
        ViewStatsSnapshot {
            fetches: self.fetches.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            peer_rejections: self.peer_rejections.load(Ordering::Relaxed),
            verification_failures: self.verification_failures.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
        }
    }
}

impl ViewStatsSnapshot {
    /// Total failed queries.
    pub fn failures(&self) -> u64 {
        self.transport_failures
            + self.peer_rejections
            + self.verification_failures
            + self.construction_failures
            + self.lookup_failures
    }
}
