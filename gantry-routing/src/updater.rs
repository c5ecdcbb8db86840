//! Membership refresh: fan out to peers and converge the directory.

use crate::directory::PeerDirectory;
use crate::fetcher::RoutingInfoFetcher;
use crate::info::{CommandFilter, RoutingInformation};
use futures::future::join_all;
use gantry_discovery::{PeerIdentity, ServiceDiscovery};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Refreshes the peer directory from service discovery.
///
/// The updater owns the local node's routing information and converges the
/// directory on each refresh trigger. It does not own a schedule; the hosting
/// application invokes [`refresh`](MembershipUpdater::refresh) on whatever
/// signal it prefers (timer tick, discovery heartbeat).
///
/// Refresh classification, per peer:
/// - routing information fetched: stored in the directory
/// - reachable but no routing body: blacklisted, skipped on later cycles
/// - transport failure: logged, peer stays eligible for the next cycle
///
/// Concurrent refreshes are allowed; entries converge last-writer-wins.
pub struct MembershipUpdater {
    directory: Arc<PeerDirectory>,
    fetcher: Arc<dyn RoutingInfoFetcher>,
    discovery: Arc<dyn ServiceDiscovery>,
    local_info: RwLock<Option<RoutingInformation>>,
}

impl MembershipUpdater {
    /// Create an updater over the given directory, fetcher, and discovery
    pub fn new(
        directory: Arc<PeerDirectory>,
        fetcher: Arc<dyn RoutingInfoFetcher>,
        discovery: Arc<dyn ServiceDiscovery>,
    ) -> Self {
        Self {
            directory,
            fetcher,
            discovery,
            local_info: RwLock::new(None),
        }
    }

    /// Replace the local node's routing information.
    ///
    /// Callable at any time, including before the first refresh. Never fails;
    /// the last call wins. No network exchange is involved.
    pub async fn update_membership(&self, load_factor: u32, command_filter: CommandFilter) {
        let info = RoutingInformation::new(load_factor, command_filter);
        info!(load_factor, "Updating local routing information");
        *self.local_info.write().await = Some(info);
    }

    /// The local node's routing information.
    ///
    /// `None` until the first [`update_membership`](Self::update_membership)
    /// call; the directory reports "unknown" rather than a default.
    pub async fn local_routing_information(&self) -> Option<RoutingInformation> {
        self.local_info.read().await.clone()
    }

    /// The identity of the local node, as reported by discovery
    pub fn local_peer(&self) -> PeerIdentity {
        self.discovery.local_instance()
    }

    /// The directory this updater converges
    pub fn directory(&self) -> &Arc<PeerDirectory> {
        &self.directory
    }

    /// One refresh cycle: enumerate all services, query every non-local,
    /// non-blacklisted instance concurrently, and apply the results.
    ///
    /// Per-peer failures are isolated; one peer's transport error never
    /// aborts the rest of the cycle. The local peer is never queried over
    /// the network.
    pub async fn refresh(&self) {
        let service_names = match self.discovery.list_service_names().await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Service enumeration failed; skipping refresh cycle");
                return;
            }
        };

        let local = self.discovery.local_instance();
        let mut candidates = Vec::new();

        for service_name in &service_names {
            let instances = match self.discovery.list_instances(service_name).await {
                Ok(instances) => instances,
                Err(e) => {
                    warn!(service = %service_name, error = %e, "Instance enumeration failed");
                    continue;
                }
            };

            for instance in instances {
                if instance.same_instance(&local) {
                    continue;
                }
                if self.directory.is_blacklisted(&instance) {
                    debug!(peer = %instance, "Skipping blacklisted peer");
                    continue;
                }
                candidates.push(instance);
            }
        }

        let fetches = candidates.into_iter().map(|peer| {
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                let result = fetcher.fetch(&peer).await;
                (peer, result)
            }
        });

        for (peer, result) in join_all(fetches).await {
            match result {
                Ok(Some(routing_info)) => {
                    debug!(peer = %peer, load_factor = routing_info.load_factor,
                           "Refreshed peer routing information");
                    self.directory.put(peer, routing_info);
                }
                Ok(None) => {
                    info!(peer = %peer, "Peer does not participate in command routing");
                    self.directory.blacklist(peer);
                }
                Err(e) => {
                    // Transient by classification: the peer stays eligible
                    // and is retried on the next cycle.
                    warn!(peer = %peer, error = %e, "Routing information fetch failed");
                }
            }
        }
    }
}
