//! Routing error types.

use gantry_discovery::DiscoveryError;
use thiserror::Error;

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Routing errors.
///
/// The taxonomy matters more than the messages: an invalid peer fails fast
/// and is never retried, a transport failure is transient and retried on the
/// next refresh cycle, and a non-participating peer is not an error at all
/// (it is signaled as `Ok(None)` by the fetcher).
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Peer cannot be queried (no resolvable address).
    #[error("Invalid peer: {0}")]
    InvalidPeer(String),

    /// Network-level failure talking to a peer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Peer responded with a body the codec could not decode.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// URL construction error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Discovery backend failure during refresh.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}

impl RoutingError {
    /// Check if this error is transient and worth retrying on the next
    /// refresh cycle. Transport and decode failures qualify; an invalid
    /// peer does not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http(_) | Self::Decode(_) | Self::Discovery(_)
        )
    }

    /// Check if this is a fail-fast usage error.
    pub fn is_invalid_peer(&self) -> bool {
        matches!(self, Self::InvalidPeer(_))
    }
}
