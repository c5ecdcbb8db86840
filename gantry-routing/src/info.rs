//! Routing information advertised by peers.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A command to be routed.
///
/// Carries the command name plus whatever correlation data the dispatcher
/// attached. The payload itself never enters the routing layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Fully qualified command name
    pub name: String,

    /// Explicit routing key, when the sender pinned one
    pub routing_key: Option<String>,

    /// Command metadata (correlation ids, tenant, ...)
    pub metadata: HashMap<String, String>,
}

impl CommandDescriptor {
    /// Create a descriptor for a named command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routing_key: None,
            metadata: HashMap::new(),
        }
    }

    /// Pin an explicit routing key
    pub fn with_routing_key(mut self, key: impl Into<String>) -> Self {
        self.routing_key = Some(key.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Serializable predicate over command descriptors.
///
/// Filters travel over the wire as part of routing information, so they are
/// data, not closures. Two filters are equal iff their serialized forms are
/// equal, which for this enum coincides with structural equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CommandFilter {
    /// Accept every command
    AcceptAll,

    /// Accept no command
    DenyAll,

    /// Accept commands whose name is in the set
    CommandNames(BTreeSet<String>),

    /// Negate a filter
    Not(Box<CommandFilter>),

    /// Accept when all inner filters accept
    And(Vec<CommandFilter>),

    /// Accept when any inner filter accepts
    Or(Vec<CommandFilter>),
}

impl CommandFilter {
    /// Filter accepting exactly the given command names
    pub fn command_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::CommandNames(names.into_iter().map(Into::into).collect())
    }

    /// Evaluate the filter against a command
    pub fn matches(&self, command: &CommandDescriptor) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::DenyAll => false,
            Self::CommandNames(names) => names.contains(&command.name),
            Self::Not(inner) => !inner.matches(command),
            Self::And(filters) => filters.iter().all(|f| f.matches(command)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(command)),
        }
    }
}

/// Command-handling capability advertised by a node.
///
/// Immutable: built once per membership update and replaced wholesale on the
/// next successful fetch or local update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingInformation {
    /// Relative willingness to accept commands; weight in routing decisions
    pub load_factor: u32,

    /// Predicate over the commands this node accepts
    pub command_filter: CommandFilter,
}

impl RoutingInformation {
    /// Create routing information
    pub fn new(load_factor: u32, command_filter: CommandFilter) -> Self {
        Self {
            load_factor,
            command_filter,
        }
    }

    /// Whether this node accepts the given command
    pub fn accepts(&self, command: &CommandDescriptor) -> bool {
        self.command_filter.matches(command)
    }
}

/// Wire codec for routing information.
///
/// The exchange treats serialization as a boundary; peers agree on the codec
/// out of band, the same way they agree on the endpoint path.
pub trait RoutingInfoCodec: Send + Sync {
    /// Serialize routing information for the wire
    fn encode(&self, info: &RoutingInformation) -> Result<Vec<u8>>;

    /// Deserialize routing information from a response body
    fn decode(&self, bytes: &[u8]) -> Result<RoutingInformation>;
}

/// JSON codec, the default wire form.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRoutingInfoCodec;

impl RoutingInfoCodec for JsonRoutingInfoCodec {
    fn encode(&self, info: &RoutingInformation) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(info)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<RoutingInformation> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
