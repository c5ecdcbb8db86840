// Gantry - a distributed command-routing directory for service clusters
//
// This library lets each node of a cluster discover its peers, exchange
// routing capability metadata with them over HTTP, and deterministically
// decide which node should handle a given command.

// Re-export the discovery boundary
pub use gantry_discovery::{DiscoveryError, InMemoryDiscovery, PeerIdentity, ServiceDiscovery};

// Re-export the routing core
pub use gantry_routing::{
    CommandDescriptor, CommandFilter, CommandNameRoutingStrategy, CommandRouter,
    ExplicitRoutingStrategy, HttpRoutingInfoFetcher, JsonRoutingInfoCodec, MembershipUpdater,
    MetadataRoutingStrategy, PeerDirectory, Result, RoutingConfig, RoutingError,
    RoutingInfoCodec, RoutingInfoFetcher, RoutingInformation, RoutingStrategy,
    DEFAULT_ROUTING_INFO_PATH,
};
