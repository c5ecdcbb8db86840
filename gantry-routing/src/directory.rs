//! Peer directory: last known routing information per peer, plus the
//! blacklist of peers confirmed not to run the exchange.

use crate::info::RoutingInformation;
use dashmap::{DashMap, DashSet};
use gantry_discovery::PeerIdentity;
use tracing::debug;

/// Concurrent map of peers to their last fetched routing information.
///
/// Reads vastly outnumber writes in steady state; both the entry map and the
/// blacklist are sharded concurrent structures, and no operation holds a lock
/// across anything slower than a map access. Refresh cycles racing each other
/// converge on last-writer-wins per entry.
#[derive(Default)]
pub struct PeerDirectory {
    entries: DashMap<PeerIdentity, RoutingInformation>,
    blacklist: DashSet<PeerIdentity>,
}

impl PeerDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known routing information for a peer.
    ///
    /// `None` means never fetched, or blacklisted.
    pub fn get(&self, peer: &PeerIdentity) -> Option<RoutingInformation> {
        if self.blacklist.contains(peer) {
            return None;
        }
        self.entries.get(peer).map(|entry| entry.value().clone())
    }

    /// Store routing information for a peer, replacing any previous value.
    ///
    /// A successful fetch supersedes blacklisting: a peer that starts serving
    /// the exchange becomes routable again.
    pub fn put(&self, peer: PeerIdentity, info: RoutingInformation) {
        self.blacklist.remove(&peer);
        self.entries.insert(peer, info);
    }

    /// Mark a peer as not running the routing-information exchange
    pub fn blacklist(&self, peer: PeerIdentity) {
        debug!(peer = %peer, "Blacklisting non-participating peer");
        self.entries.remove(&peer);
        self.blacklist.insert(peer);
    }

    /// Whether a peer is currently blacklisted
    pub fn is_blacklisted(&self, peer: &PeerIdentity) -> bool {
        self.blacklist.contains(peer)
    }

    /// Remove a peer's blacklist mark so the next refresh queries it again
    pub fn clear_blacklist(&self, peer: &PeerIdentity) {
        self.blacklist.remove(peer);
    }

    /// Drop a peer entirely (entry and blacklist mark)
    pub fn remove(&self, peer: &PeerIdentity) {
        self.entries.remove(peer);
        self.blacklist.remove(peer);
    }

    /// Snapshot of all known peers and their routing information.
    ///
    /// The snapshot is whatever is visible at call time; concurrent refreshes
    /// may land before or after it.
    pub fn peers(&self) -> Vec<(PeerIdentity, RoutingInformation)> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Number of peers with known routing information
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no peer has known routing information
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
