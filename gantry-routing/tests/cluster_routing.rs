//! End-to-end routing: discovery, refresh over HTTP, and command routing.

use gantry_discovery::{InMemoryDiscovery, PeerIdentity};
use gantry_routing::{
    CommandDescriptor, CommandFilter, CommandNameRoutingStrategy, CommandRouter,
    ExplicitRoutingStrategy, HttpRoutingInfoFetcher, MembershipUpdater, PeerDirectory,
    RoutingConfig, RoutingInformation,
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> RoutingConfig {
    RoutingConfig::builder()
        .fetch_timeout(Duration::from_secs(2))
        .connect_timeout(Duration::from_secs(1))
        .build()
}

async fn serve_routing_info(server: &MockServer, info: &RoutingInformation) {
    Mock::given(method("GET"))
        .and(path("/message-routing-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info))
        .mount(server)
        .await;
}

struct Cluster {
    membership: Arc<MembershipUpdater>,
    directory: Arc<PeerDirectory>,
    router: CommandRouter,
}

fn cluster(discovery: InMemoryDiscovery) -> Cluster {
    let directory = Arc::new(PeerDirectory::new());
    let fetcher = Arc::new(HttpRoutingInfoFetcher::new(test_config()).unwrap());
    let membership = Arc::new(MembershipUpdater::new(
        Arc::clone(&directory),
        fetcher,
        Arc::new(discovery),
    ));
    let router = CommandRouter::new(
        Arc::clone(&membership),
        vec![
            Arc::new(ExplicitRoutingStrategy),
            Arc::new(CommandNameRoutingStrategy),
        ],
    );
    Cluster {
        membership,
        directory,
        router,
    }
}

fn local_peer() -> PeerIdentity {
    PeerIdentity::new("orders", Some(Url::parse("http://localhost:8080").unwrap()))
}

#[tokio::test]
async fn route_before_any_update_or_refresh_returns_none() {
    let discovery = InMemoryDiscovery::new(local_peer());
    let cluster = cluster(discovery);

    let command = CommandDescriptor::new("orders.Create");
    assert_eq!(cluster.router.route(&command).await, None);
}

#[tokio::test]
async fn refresh_stores_remote_peer_and_routes_to_it() {
    let server = MockServer::start().await;
    let info = RoutingInformation::new(1, CommandFilter::AcceptAll);
    serve_routing_info(&server, &info).await;

    let remote = PeerIdentity::new("orders", Some(Url::parse(&server.uri()).unwrap()));
    let discovery = InMemoryDiscovery::new(local_peer());
    discovery.register(&remote).await.unwrap();

    let cluster = cluster(discovery);
    cluster.membership.refresh().await;

    assert_eq!(cluster.directory.get(&remote), Some(info));

    // The remote is the only candidate: any command routes to it.
    let command = CommandDescriptor::new("orders.Create");
    assert_eq!(cluster.router.route(&command).await, Some(remote));
}

#[tokio::test]
async fn local_node_is_a_candidate_once_membership_is_updated() {
    let local = local_peer();
    let discovery = InMemoryDiscovery::new(local.clone());
    let cluster = cluster(discovery);

    cluster
        .membership
        .update_membership(1, CommandFilter::AcceptAll)
        .await;

    let command = CommandDescriptor::new("orders.Create");
    let selected = cluster.router.route(&command).await.unwrap();
    assert!(selected.same_instance(&local), "only candidate is the local node");
}

#[tokio::test]
async fn local_update_involves_no_network_call() {
    let discovery = InMemoryDiscovery::new(local_peer());
    let cluster = cluster(discovery);

    // No HTTP server exists anywhere; an update must still succeed and be
    // readable immediately.
    cluster
        .membership
        .update_membership(5, CommandFilter::command_names(["orders.Create"]))
        .await;

    let info = cluster.membership.local_routing_information().await.unwrap();
    assert_eq!(
        info,
        RoutingInformation::new(5, CommandFilter::command_names(["orders.Create"]))
    );
}

#[tokio::test]
async fn filters_exclude_non_accepting_peers() {
    let orders_server = MockServer::start().await;
    serve_routing_info(
        &orders_server,
        &RoutingInformation::new(1, CommandFilter::command_names(["orders.Create"])),
    )
    .await;

    let billing_server = MockServer::start().await;
    serve_routing_info(
        &billing_server,
        &RoutingInformation::new(1, CommandFilter::command_names(["billing.Charge"])),
    )
    .await;

    let orders_peer =
        PeerIdentity::new("orders", Some(Url::parse(&orders_server.uri()).unwrap()));
    let billing_peer =
        PeerIdentity::new("billing", Some(Url::parse(&billing_server.uri()).unwrap()));

    let discovery = InMemoryDiscovery::new(local_peer());
    discovery.register(&orders_peer).await.unwrap();
    discovery.register(&billing_peer).await.unwrap();

    let cluster = cluster(discovery);
    cluster.membership.refresh().await;

    let charge = CommandDescriptor::new("billing.Charge");
    assert_eq!(cluster.router.route(&charge).await, Some(billing_peer));

    let unknown = CommandDescriptor::new("inventory.Reserve");
    assert_eq!(cluster.router.route(&unknown).await, None);
}

#[tokio::test]
async fn routing_is_deterministic_across_equal_candidates() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;
    let info = RoutingInformation::new(1, CommandFilter::AcceptAll);
    serve_routing_info(&server_a, &info).await;
    serve_routing_info(&server_b, &info).await;

    let peer_a = PeerIdentity::new("orders", Some(Url::parse(&server_a.uri()).unwrap()));
    let peer_b = PeerIdentity::new("orders", Some(Url::parse(&server_b.uri()).unwrap()));

    let discovery = InMemoryDiscovery::new(local_peer());
    discovery.register(&peer_a).await.unwrap();
    discovery.register(&peer_b).await.unwrap();

    let cluster = cluster(discovery);
    cluster.membership.refresh().await;

    let command = CommandDescriptor::new("orders.Create").with_routing_key("order-42");
    let first = cluster.router.route(&command).await.unwrap();
    for _ in 0..16 {
        assert_eq!(cluster.router.route(&command).await, Some(first.clone()));
    }
}

#[tokio::test]
async fn non_participating_peer_is_blacklisted_and_not_requeried() {
    // Serves the endpoint with an empty body: reachable, not participating.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/message-routing-information"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let plain_peer = PeerIdentity::new("legacy", Some(Url::parse(&server.uri()).unwrap()));
    let discovery = InMemoryDiscovery::new(local_peer());
    discovery.register(&plain_peer).await.unwrap();

    let cluster = cluster(discovery);

    cluster.membership.refresh().await;
    assert!(cluster.directory.is_blacklisted(&plain_peer));

    // Second cycle: the call-count expectation on the mock verifies no
    // further request reaches the peer.
    cluster.membership.refresh().await;
    assert!(cluster.directory.is_blacklisted(&plain_peer));
}

#[tokio::test]
async fn transport_failure_is_retried_on_the_next_cycle() {
    // Nothing listens on this address.
    let unreachable = PeerIdentity::new(
        "orders",
        Some(Url::parse("http://127.0.0.1:1").unwrap()),
    );
    let discovery = InMemoryDiscovery::new(local_peer());
    discovery.register(&unreachable).await.unwrap();

    let cluster = cluster(discovery);

    cluster.membership.refresh().await;
    assert!(!cluster.directory.is_blacklisted(&unreachable));
    assert!(cluster.directory.get(&unreachable).is_none());

    // Still eligible: the peer may come back.
    cluster.membership.refresh().await;
    assert!(!cluster.directory.is_blacklisted(&unreachable));
}
