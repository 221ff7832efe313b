//! Insertion-ordered collection of declared resource nodes

use crate::error::{GraphError, Result};
use crate::node::{ResourceNode, ResourceType};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// The set of nodes declared during one construction run
///
/// Iteration order is insertion order, so a graph built from the same spec
/// twice serializes identically. Node names must be unique.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl<'de> Deserialize<'de> for ResourceGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            nodes: Vec<ResourceNode>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let mut graph = ResourceGraph::new();
        for node in raw.nodes {
            graph.insert(node).map_err(serde::de::Error::custom)?;
        }
        Ok(graph)
    }
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, rejecting duplicate names
    pub fn insert(&mut self, node: ResourceNode) -> Result<()> {
        if self.index.contains_key(&node.name) {
            return Err(GraphError::DuplicateNode(node.name));
        }
        tracing::debug!(name = %node.name, resource_type = %node.resource_type, "node declared");
        self.index.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResourceNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    pub fn by_type(&self, resource_type: ResourceType) -> Vec<&ResourceNode> {
        self.nodes
            .iter()
            .filter(|n| n.resource_type == resource_type)
            .collect()
    }

    /// Nodes owned by a single component
    pub fn by_owner(&self, owner: &str) -> Vec<&ResourceNode> {
        self.nodes.iter().filter(|n| n.owner == owner).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
