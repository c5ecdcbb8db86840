//! Routing configuration.

use std::time::Duration;

/// Default relative path peers serve their routing information on.
pub const DEFAULT_ROUTING_INFO_PATH: &str = "/message-routing-information";

/// Routing configuration.
///
/// `routing_info_path` must be configured identically on every node of the
/// cluster. A node probing peers on a different path sees empty responses and
/// blacklists perfectly healthy peers; this is an operational error, not one
/// the exchange defends against.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Relative path of the routing-information endpoint on each peer.
    pub routing_info_path: String,
    /// Total timeout for a single peer fetch.
    pub fetch_timeout: Duration,
    /// Connection timeout for a single peer fetch.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            routing_info_path: DEFAULT_ROUTING_INFO_PATH.to_string(),
            fetch_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            user_agent: format!("gantry-routing/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RoutingConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RoutingConfigBuilder {
        RoutingConfigBuilder::default()
    }
}

/// Builder for routing configuration.
#[derive(Debug, Default)]
pub struct RoutingConfigBuilder {
    config: RoutingConfig,
}

impl RoutingConfigBuilder {
    /// Set the routing-information endpoint path.
    pub fn routing_info_path(mut self, path: impl Into<String>) -> Self {
        self.config.routing_info_path = path.into();
        self
    }

    /// Set the per-peer fetch timeout.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RoutingConfig {
        self.config
    }
}
