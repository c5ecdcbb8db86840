//! Peer identity and the discovery boundary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Service discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Discovery backend error: {0}")]
    Backend(String),
}

/// Identity of a single addressable service instance.
///
/// A service name may host many instances; an instance is identified by its
/// service name plus its network address. Remote instances must carry an
/// address to be queried; `instance_uri` may be `None` for identities that
/// are only compared, never fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerIdentity {
    /// Logical service name (shared by all instances of a service)
    pub service_id: String,

    /// Network address of this instance, if known
    pub instance_uri: Option<Url>,

    /// Instance metadata (zone, version tags, ...)
    pub metadata: HashMap<String, String>,
}

impl PeerIdentity {
    /// Create a new peer identity
    pub fn new(service_id: impl Into<String>, instance_uri: Option<Url>) -> Self {
        Self {
            service_id: service_id.into(),
            instance_uri,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this identity refers to the same instance as `other`
    ///
    /// Metadata is ignored; two identities are the same instance when the
    /// service name and address agree.
    pub fn same_instance(&self, other: &PeerIdentity) -> bool {
        self.service_id == other.service_id && self.instance_uri == other.instance_uri
    }
}

// Identity is keyed on (service_id, instance_uri); metadata is advisory and
// must not split directory entries for the same instance.
impl PartialEq for PeerIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for PeerIdentity {}

impl std::hash::Hash for PeerIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.service_id.hash(state);
        self.instance_uri.as_ref().map(Url::as_str).hash(state);
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance_uri {
            Some(uri) => write!(f, "{}@{}", self.service_id, uri),
            None => write!(f, "{}@<unaddressed>", self.service_id),
        }
    }
}

/// Discovery boundary consumed by the routing layer
#[async_trait]
pub trait ServiceDiscovery: Send + Sync {
    /// List all known service names
    async fn list_service_names(&self) -> Result<Vec<String>, DiscoveryError>;

    /// List the instances of a service
    async fn list_instances(&self, service_name: &str) -> Result<Vec<PeerIdentity>, DiscoveryError>;

    /// The identity of the hosting node itself
    fn local_instance(&self) -> PeerIdentity;
}
