//! Routing key extraction strategies.

use crate::info::CommandDescriptor;
use std::sync::Arc;

/// Extracts the routing key a command should be distributed by.
///
/// A router owns an explicit ordered list of strategies; for each command the
/// first strategy (highest priority, name as tie-break) producing a key wins.
/// There is no process-wide registry, so tests stay hermetic.
pub trait RoutingStrategy: Send + Sync {
    /// Stable strategy name, the secondary ordering key
    fn name(&self) -> &str;

    /// Selection priority; higher is consulted first
    fn priority(&self) -> i32;

    /// Routing key for the command, if this strategy can derive one
    fn routing_key(&self, command: &CommandDescriptor) -> Option<String>;
}

/// Sort strategies for selection: priority descending, name ascending.
pub(crate) fn sort_strategies(strategies: &mut [Arc<dyn RoutingStrategy>]) {
    strategies.sort_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Resolve a command's routing key through an ordered strategy list.
pub(crate) fn resolve_routing_key(
    strategies: &[Arc<dyn RoutingStrategy>],
    command: &CommandDescriptor,
) -> Option<String> {
    strategies.iter().find_map(|s| s.routing_key(command))
}

/// Uses the routing key the sender pinned on the command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitRoutingStrategy;

impl RoutingStrategy for ExplicitRoutingStrategy {
    fn name(&self) -> &str {
        "explicit"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn routing_key(&self, command: &CommandDescriptor) -> Option<String> {
        command.routing_key.clone()
    }
}

/// Derives the routing key from a configured metadata entry.
#[derive(Debug, Clone)]
pub struct MetadataRoutingStrategy {
    metadata_key: String,
}

impl MetadataRoutingStrategy {
    /// Route by the given metadata entry
    pub fn new(metadata_key: impl Into<String>) -> Self {
        Self {
            metadata_key: metadata_key.into(),
        }
    }
}

impl RoutingStrategy for MetadataRoutingStrategy {
    fn name(&self) -> &str {
        "metadata"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn routing_key(&self, command: &CommandDescriptor) -> Option<String> {
        command.metadata.get(&self.metadata_key).cloned()
    }
}

/// Falls back to the command name itself.
///
/// Always succeeds, so a router carrying it never fails key resolution;
/// commands of the same type consistently land on the same peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandNameRoutingStrategy;

impl RoutingStrategy for CommandNameRoutingStrategy {
    fn name(&self) -> &str {
        "command-name"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn routing_key(&self, command: &CommandDescriptor) -> Option<String> {
        Some(command.name.clone())
    }
}
