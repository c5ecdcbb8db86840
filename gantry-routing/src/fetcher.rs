//! HTTP exchange for peer routing information.

use crate::config::RoutingConfig;
use crate::error::{Result, RoutingError};
use crate::info::{JsonRoutingInfoCodec, RoutingInfoCodec, RoutingInformation};
use async_trait::async_trait;
use gantry_discovery::PeerIdentity;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::debug;

/// Fetches routing information from a single peer.
///
/// `Ok(None)` is the non-participating signal: the peer was reachable but
/// does not serve the exchange. It is distinct from `Err`, which covers
/// transport-level failures and is retried on later refresh cycles.
#[async_trait]
pub trait RoutingInfoFetcher: Send + Sync {
    /// Query one peer for its routing information
    async fn fetch(&self, peer: &PeerIdentity) -> Result<Option<RoutingInformation>>;
}

/// Fetcher issuing a GET against each peer's routing-information endpoint.
#[derive(Clone)]
pub struct HttpRoutingInfoFetcher {
    client: reqwest::Client,
    codec: Arc<dyn RoutingInfoCodec>,
    config: Arc<RoutingConfig>,
}

impl HttpRoutingInfoFetcher {
    /// Create a fetcher with the default JSON codec
    pub fn new(config: RoutingConfig) -> Result<Self> {
        Self::with_codec(config, Arc::new(JsonRoutingInfoCodec))
    }

    /// Create a fetcher with an explicit codec
    pub fn with_codec(config: RoutingConfig, codec: Arc<dyn RoutingInfoCodec>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            codec,
            config: Arc::new(config),
        })
    }

    /// The configuration this fetcher was built with
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }
}

#[async_trait]
impl RoutingInfoFetcher for HttpRoutingInfoFetcher {
    async fn fetch(&self, peer: &PeerIdentity) -> Result<Option<RoutingInformation>> {
        let base = peer.instance_uri.as_ref().ok_or_else(|| {
            RoutingError::InvalidPeer(format!(
                "peer {} has no instance URI and cannot be queried",
                peer
            ))
        })?;

        let endpoint = base.join(&self.config.routing_info_path)?;

        let response = self
            .client
            .get(endpoint.clone())
            .timeout(self.config.fetch_timeout)
            .send()
            .await?;

        let status = response.status();

        // A peer without the endpoint is reachable but non-participating,
        // the same classification as a participating peer replying with an
        // empty body.
        if status == StatusCode::NOT_FOUND {
            debug!(peer = %peer, "Peer does not serve the routing-information endpoint");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(RoutingError::Transport(format!(
                "GET {} returned status {}",
                endpoint, status
            )));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            debug!(peer = %peer, "Peer returned no routing information");
            return Ok(None);
        }

        let info = self.codec.decode(&body)?;
        debug!(peer = %peer, load_factor = info.load_factor, "Fetched routing information");
        Ok(Some(info))
    }
}
