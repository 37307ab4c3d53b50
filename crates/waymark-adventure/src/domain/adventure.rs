//! The adventure node graph.
//!
//! An [`Adventure`] is built once from its serialized [`AdventureDefinition`]
//! and is read-only afterwards. Nodes are owned by a name-keyed map; routes
//! and role pointers refer to other nodes by name only, so every traversal
//! goes back through [`Adventure::node`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use waymark_core::error::DomainError;

use super::speech::SpeechFragment;

/// Serialized form of an adventure, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdventureDefinition {
    /// Unique adventure identifier.
    pub id: String,
    /// Voice used when rendering text fragments.
    #[serde(default)]
    pub voice_id: Option<String>,
    /// Name of the node `Begin` moves to.
    #[serde(default)]
    pub start_node: Option<String>,
    /// Name of the node played on stop/cancel.
    #[serde(default)]
    pub stop_node: Option<String>,
    /// Name of the node played on help.
    #[serde(default)]
    pub help_node: Option<String>,
    /// Name of the node played when an intent cannot be routed.
    #[serde(default)]
    pub unknown_node: Option<String>,
    /// All nodes of the adventure.
    #[serde(default)]
    pub nodes: Vec<AdventureNode>,
}

/// A single narrative beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureNode {
    /// Graph key, unique within the adventure.
    pub name: String,
    /// Spoken when the node is entered.
    #[serde(default)]
    pub output_speech: Vec<SpeechFragment>,
    /// Spoken when the user needs prompting again.
    #[serde(default)]
    pub reprompt: Vec<SpeechFragment>,
    /// Outgoing edges in declaration order.
    #[serde(default)]
    pub routes: Vec<NodeRoute>,
}

/// A directed edge triggered by an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRoute {
    /// Intent name that triggers this route.
    pub intent: String,
    /// Destination node name.
    #[serde(rename = "node")]
    pub next_node: String,
}

impl AdventureNode {
    /// Finds the first route triggered by `intent_name`, ignoring ASCII case.
    #[must_use]
    pub fn route_for(&self, intent_name: &str) -> Option<&NodeRoute> {
        self.routes
            .iter()
            .find(|route| route.intent.eq_ignore_ascii_case(intent_name))
    }

    /// Returns `true` if the node offers the user any choice.
    #[must_use]
    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }
}

/// Distinguished nodes an adventure points at by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Where `Begin` and "start over" lead.
    Start,
    /// Played on stop/cancel.
    Stop,
    /// Played on help.
    Help,
    /// Played when an intent cannot be routed.
    Unknown,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Help => "help",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// The whole narrative graph for one skill instance.
#[derive(Debug, Clone)]
pub struct Adventure {
    id: String,
    voice_id: Option<String>,
    nodes: HashMap<String, AdventureNode>,
    start_node: Option<String>,
    stop_node: Option<String>,
    help_node: Option<String>,
    unknown_node: Option<String>,
}

/// Node names fold ASCII case only, the same rule routes use for intents.
fn node_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Blank role pointers count as unset.
fn role_pointer(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty())
}

impl TryFrom<AdventureDefinition> for Adventure {
    type Error = DomainError;

    fn try_from(definition: AdventureDefinition) -> Result<Self, Self::Error> {
        if definition.id.trim().is_empty() {
            return Err(DomainError::MalformedAdventure(
                "adventure id must not be empty".to_owned(),
            ));
        }

        let mut nodes: HashMap<String, AdventureNode> = HashMap::with_capacity(definition.nodes.len());
        for node in definition.nodes {
            if node.name.trim().is_empty() {
                return Err(DomainError::MalformedAdventure(format!(
                    "adventure '{}' contains a node without a name",
                    definition.id
                )));
            }
            let key = node_key(&node.name);
            if let Some(existing) = nodes.get(&key) {
                return Err(DomainError::MalformedAdventure(format!(
                    "adventure '{}' declares node '{}' more than once (clashes with '{}')",
                    definition.id, node.name, existing.name
                )));
            }
            nodes.insert(key, node);
        }

        Ok(Self {
            id: definition.id,
            voice_id: definition.voice_id.filter(|v| !v.trim().is_empty()),
            nodes,
            start_node: role_pointer(definition.start_node),
            stop_node: role_pointer(definition.stop_node),
            help_node: role_pointer(definition.help_node),
            unknown_node: role_pointer(definition.unknown_node),
        })
    }
}

impl Adventure {
    /// Returns the adventure identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the voice used for text fragments, if any.
    #[must_use]
    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    /// Looks up a node by name, ignoring ASCII case.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&AdventureNode> {
        self.nodes.get(&node_key(name))
    }

    /// Iterates over all nodes in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &AdventureNode> {
        self.nodes.values()
    }

    /// Returns the node name a role points at, if the pointer is set.
    #[must_use]
    pub fn role_pointer(&self, role: NodeRole) -> Option<&str> {
        match role {
            NodeRole::Start => self.start_node.as_deref(),
            NodeRole::Stop => self.stop_node.as_deref(),
            NodeRole::Help => self.help_node.as_deref(),
            NodeRole::Unknown => self.unknown_node.as_deref(),
        }
    }

    /// Resolves a role pointer to its node.
    ///
    /// Returns `Ok(None)` when the pointer is unset.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the pointer is set but
    /// names a node that does not exist.
    pub fn role_node(&self, role: NodeRole) -> Result<Option<&AdventureNode>, DomainError> {
        let Some(name) = self.role_pointer(role) else {
            return Ok(None);
        };
        self.node(name).map(Some).ok_or_else(|| {
            DomainError::GraphConfiguration(format!(
                "{role} node '{name}' not found in adventure '{}'",
                self.id
            ))
        })
    }

    /// Resolves a role pointer that the engine cannot work without.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the pointer is unset or
    /// does not resolve.
    pub fn required_role_node(&self, role: NodeRole) -> Result<&AdventureNode, DomainError> {
        self.role_node(role)?.ok_or_else(|| {
            DomainError::GraphConfiguration(format!(
                "adventure '{}' has no {role} node configured",
                self.id
            ))
        })
    }

    /// Resolves the start node. See [`Adventure::role_node`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the pointer does not resolve.
    pub fn start_node(&self) -> Result<Option<&AdventureNode>, DomainError> {
        self.role_node(NodeRole::Start)
    }

    /// Resolves the stop node. See [`Adventure::role_node`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the pointer does not resolve.
    pub fn stop_node(&self) -> Result<Option<&AdventureNode>, DomainError> {
        self.role_node(NodeRole::Stop)
    }

    /// Resolves the help node. See [`Adventure::role_node`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the pointer does not resolve.
    pub fn help_node(&self) -> Result<Option<&AdventureNode>, DomainError> {
        self.role_node(NodeRole::Help)
    }

    /// Resolves the unknown/fallback node. See [`Adventure::role_node`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GraphConfiguration` if the pointer does not resolve.
    pub fn unknown_node(&self) -> Result<Option<&AdventureNode>, DomainError> {
        self.role_node(NodeRole::Unknown)
    }

    /// Lists `(node, route)` pairs whose destination does not exist.
    #[must_use]
    pub fn dangling_routes(&self) -> Vec<(&AdventureNode, &NodeRoute)> {
        let mut dangling: Vec<_> = self
            .nodes
            .values()
            .flat_map(|node| node.routes.iter().map(move |route| (node, route)))
            .filter(|(_, route)| self.node(&route.next_node).is_none())
            .collect();
        dangling.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        dangling
    }
}
