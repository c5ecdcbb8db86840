//! Deterministic command routing over the peer directory.

use crate::directory::PeerDirectory;
use crate::info::{CommandDescriptor, RoutingInformation};
use crate::strategy::{resolve_routing_key, sort_strategies, RoutingStrategy};
use crate::updater::MembershipUpdater;
use gantry_discovery::PeerIdentity;
use std::sync::Arc;
use tracing::debug;

/// Routes commands to the peer that should handle them.
///
/// Candidates are the directory's known peers plus the local node once its
/// routing information has been set. Selection is weighted rendezvous
/// hashing over the command's routing key, so every node holding the same
/// directory snapshot picks the same peer without a coordinator. When the
/// local node wins, the returned identity is the local one and the caller
/// dispatches in-process instead of over the network.
pub struct CommandRouter {
    membership: Arc<MembershipUpdater>,
    strategies: Vec<Arc<dyn RoutingStrategy>>,
}

impl CommandRouter {
    /// Create a router with an explicit, ordered strategy list.
    ///
    /// Strategies are sorted once at construction (priority descending, name
    /// ascending) and consulted in that order for every command.
    pub fn new(
        membership: Arc<MembershipUpdater>,
        mut strategies: Vec<Arc<dyn RoutingStrategy>>,
    ) -> Self {
        sort_strategies(&mut strategies);
        Self {
            membership,
            strategies,
        }
    }

    /// The ordered strategy list this router consults
    pub fn strategies(&self) -> &[Arc<dyn RoutingStrategy>] {
        &self.strategies
    }

    /// Pick the destination peer for a command.
    ///
    /// Returns `None` when no known peer (including the local node) accepts
    /// the command; the caller decides the fallback. Never fails.
    pub async fn route(&self, command: &CommandDescriptor) -> Option<PeerIdentity> {
        let Some(routing_key) = resolve_routing_key(&self.strategies, command) else {
            debug!(command = %command.name, "No strategy produced a routing key");
            return None;
        };

        let directory: &PeerDirectory = self.membership.directory();
        let mut candidates: Vec<(PeerIdentity, RoutingInformation)> = directory
            .peers()
            .into_iter()
            .filter(|(_, info)| info.accepts(command))
            .collect();

        if let Some(local_info) = self.membership.local_routing_information().await {
            if local_info.accepts(command) {
                candidates.push((self.membership.local_peer(), local_info));
            }
        }

        let selected = select_by_rendezvous(&routing_key, &candidates);
        match &selected {
            Some(peer) => debug!(command = %command.name, key = %routing_key, peer = %peer,
                                 "Routed command"),
            None => debug!(command = %command.name, key = %routing_key,
                           "No candidate accepts command"),
        }
        selected
    }
}

/// Weighted rendezvous (highest-random-weight) selection.
///
/// Every candidate scores `weight / -ln(h)` where `h` is the unit-interval
/// hash of (peer, routing key). The highest score wins; peers with zero load
/// factor advertise no capacity and are never selected. Score ties fall back
/// to peer identity ordering so the pick stays stable.
fn select_by_rendezvous(
    routing_key: &str,
    candidates: &[(PeerIdentity, RoutingInformation)],
) -> Option<PeerIdentity> {
    let mut best: Option<(f64, String, &PeerIdentity)> = None;

    for (peer, info) in candidates {
        if info.load_factor == 0 {
            continue;
        }

        let peer_key = peer.to_string();
        let h = unit_interval_hash(&peer_key, routing_key);
        let score = f64::from(info.load_factor) / -h.ln();

        let better = match &best {
            None => true,
            Some((best_score, best_key, _)) => {
                score > *best_score || (score == *best_score && peer_key < *best_key)
            }
        };
        if better {
            best = Some((score, peer_key, peer));
        }
    }

    best.map(|(_, _, peer)| peer.clone())
}

/// Hash (peer, key) to the open unit interval (0, 1).
fn unit_interval_hash(peer_key: &str, routing_key: &str) -> f64 {
    let h = fnv1a64(&[peer_key.as_bytes(), b"\x00", routing_key.as_bytes()]);
    // Shift into (0, 1): never exactly 0 (ln would blow up) nor 1.
    (h as f64 + 1.0) / (u64::MAX as f64 + 2.0)
}

// FNV-1a, 64-bit. The std hasher is randomized per process; routing needs
// the same hash on every node of the cluster.
fn fnv1a64(parts: &[&[u8]]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for part in parts {
        for byte in *part {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}
