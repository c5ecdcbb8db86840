//! In-memory service discovery (for testing)

use crate::peer::{DiscoveryError, PeerIdentity, ServiceDiscovery};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory service discovery (for testing/development)
///
/// Instances are registered explicitly. The local instance is fixed at
/// construction and is always reported among its service's instances.
#[derive(Clone)]
pub struct InMemoryDiscovery {
    local: PeerIdentity,
    instances: Arc<RwLock<HashMap<String, Vec<PeerIdentity>>>>,
}

impl InMemoryDiscovery {
    /// Create new in-memory discovery with the given local instance
    pub fn new(local: PeerIdentity) -> Self {
        let mut instances = HashMap::new();
        instances.insert(local.service_id.clone(), vec![local.clone()]);
        Self {
            local,
            instances: Arc::new(RwLock::new(instances)),
        }
    }

    /// Register a peer instance
    pub async fn register(&self, peer: &PeerIdentity) -> Result<(), DiscoveryError> {
        let mut instances = self.instances.write().await;
        let entries = instances.entry(peer.service_id.clone()).or_default();
        if !entries.iter().any(|p| p.same_instance(peer)) {
            entries.push(peer.clone());
        }
        Ok(())
    }

    /// Deregister a peer instance
    pub async fn deregister(&self, peer: &PeerIdentity) -> Result<(), DiscoveryError> {
        let mut instances = self.instances.write().await;
        match instances.get_mut(&peer.service_id) {
            Some(entries) => {
                entries.retain(|p| !p.same_instance(peer));
                if entries.is_empty() {
                    instances.remove(&peer.service_id);
                }
                Ok(())
            }
            None => Err(DiscoveryError::ServiceNotFound(peer.service_id.clone())),
        }
    }

    /// Remove all registered instances except the local one
    pub async fn clear(&self) {
        let mut instances = self.instances.write().await;
        instances.clear();
        instances.insert(self.local.service_id.clone(), vec![self.local.clone()]);
    }

    /// Count of registered instances across all services
    pub async fn count(&self) -> usize {
        self.instances.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ServiceDiscovery for InMemoryDiscovery {
    async fn list_service_names(&self) -> Result<Vec<String>, DiscoveryError> {
        let instances = self.instances.read().await;
        let mut names: Vec<String> = instances.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn list_instances(
        &self,
        service_name: &str,
    ) -> Result<Vec<PeerIdentity>, DiscoveryError> {
        self.instances
            .read()
            .await
            .get(service_name)
            .cloned()
            .ok_or_else(|| DiscoveryError::ServiceNotFound(service_name.to_string()))
    }

    fn local_instance(&self) -> PeerIdentity {
        self.local.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn peer(service: &str, uri: &str) -> PeerIdentity {
        PeerIdentity::new(service, Some(Url::parse(uri).unwrap()))
    }

    #[tokio::test]
    async fn test_in_memory_discovery() {
        let local = peer("orders", "http://localhost:8080");
        let discovery = InMemoryDiscovery::new(local.clone());
        assert_eq!(discovery.count().await, 1);

        let remote = peer("orders", "http://10.0.0.2:8080");
        discovery.register(&remote).await.unwrap();
        assert_eq!(discovery.count().await, 2);

        let names = discovery.list_service_names().await.unwrap();
        assert_eq!(names, vec!["orders".to_string()]);

        let instances = discovery.list_instances("orders").await.unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(discovery.local_instance(), local);

        discovery.deregister(&remote).await.unwrap();
        assert_eq!(discovery.count().await, 1);
    }

    #[tokio::test]
    async fn test_register_same_instance_twice_is_idempotent() {
        let discovery = InMemoryDiscovery::new(peer("orders", "http://localhost:8080"));
        let remote = peer("orders", "http://10.0.0.2:8080");

        discovery.register(&remote).await.unwrap();
        discovery.register(&remote).await.unwrap();

        assert_eq!(discovery.count().await, 2);
    }

    #[tokio::test]
    async fn test_service_not_found() {
        let discovery = InMemoryDiscovery::new(peer("orders", "http://localhost:8080"));

        let result = discovery.list_instances("nonexistent").await;
        assert!(result.is_err());
    }
}
