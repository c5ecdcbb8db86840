//! Distributed Command Routing for Gantry
//!
//! This crate is the routing core of a Gantry cluster: each node advertises
//! its command-handling capability over HTTP, learns the capabilities of its
//! peers through membership refresh cycles, and deterministically picks the
//! peer a command should be dispatched to.
//!
//! ## Features
//!
//! - **Routing Information** - Load factor plus a serializable command filter
//! - **Peer Directory** - Concurrent map of peers with a non-participant blacklist
//! - **HTTP Exchange** - Per-peer GET with independent timeouts
//! - **Membership Refresh** - Concurrent fan-out driven by an external trigger
//! - **Deterministic Routing** - Weighted rendezvous hashing over routing keys
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gantry_discovery::{InMemoryDiscovery, PeerIdentity};
//! use gantry_routing::*;
//! use std::sync::Arc;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let local = PeerIdentity::new("orders", Some(Url::parse("http://localhost:8080")?));
//!     let discovery = Arc::new(InMemoryDiscovery::new(local));
//!
//!     let directory = Arc::new(PeerDirectory::new());
//!     let fetcher = Arc::new(HttpRoutingInfoFetcher::new(RoutingConfig::default())?);
//!     let membership = Arc::new(MembershipUpdater::new(directory, fetcher, discovery));
//!
//!     // Advertise local capability, then refresh on any external trigger.
//!     membership.update_membership(100, CommandFilter::AcceptAll).await;
//!     membership.refresh().await;
//!
//!     let router = CommandRouter::new(
//!         Arc::clone(&membership),
//!         vec![
//!             Arc::new(ExplicitRoutingStrategy),
//!             Arc::new(CommandNameRoutingStrategy),
//!         ],
//!     );
//!
//!     let command = CommandDescriptor::new("orders.Create").with_routing_key("order-42");
//!     if let Some(peer) = router.route(&command).await {
//!         println!("Dispatch to: {peer}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod fetcher;
pub mod info;
pub mod router;
pub mod strategy;
pub mod updater;

pub use config::{RoutingConfig, RoutingConfigBuilder, DEFAULT_ROUTING_INFO_PATH};
pub use directory::PeerDirectory;
pub use error::{Result, RoutingError};
pub use fetcher::{HttpRoutingInfoFetcher, RoutingInfoFetcher};
pub use info::{
    CommandDescriptor, CommandFilter, JsonRoutingInfoCodec, RoutingInfoCodec, RoutingInformation,
};
pub use router::CommandRouter;
pub use strategy::{
    CommandNameRoutingStrategy, ExplicitRoutingStrategy, MetadataRoutingStrategy, RoutingStrategy,
};
pub use updater::MembershipUpdater;
