//! Node registry — static capacity and membership of the scheduling domain.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{SchedulingError, SchedulingResult};
use crate::types::{NodeCapacity, NodeName};

/// Capacity of every node in the scheduling domain, keyed by node name.
///
/// Iteration is in name order, which keeps scoring reproducible.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeName, NodeCapacity>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node or replace the capacity of an existing one.
    ///
    /// Returns the previous capacity if the node was already registered.
    pub fn add_node(
        &mut self,
        name: impl Into<NodeName>,
        cpu: u32,
        memory: u64,
    ) -> SchedulingResult<Option<NodeCapacity>> {
        let name = name.into();
        if cpu == 0 {
            return Err(SchedulingError::InvalidCapacity {
                node: name,
                reason: "cpu capacity must be positive".to_string(),
            });
        }
        if memory == 0 {
            return Err(SchedulingError::InvalidCapacity {
                node: name,
                reason: "memory capacity must be positive".to_string(),
            });
        }

        let previous = self.nodes.insert(name.clone(), NodeCapacity { cpu, memory });
        match previous {
            Some(old) => debug!(node = %name, ?old, cpu, memory, "node capacity replaced"),
            None => info!(node = %name, cpu, memory, "node added"),
        }
        Ok(previous)
    }

    /// Remove a node. Unknown names are a no-op.
    pub fn remove_node(&mut self, name: &str) -> Option<NodeCapacity> {
        let removed = self.nodes.remove(name);
        if removed.is_some() {
            info!(node = %name, "node removed");
        }
        removed
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Names of all registered nodes, sorted.
    pub fn list_nodes(&self) -> Vec<NodeName> {
        self.nodes.keys().cloned().collect()
    }

    pub fn capacity(&self, name: &str) -> Option<NodeCapacity> {
        self.nodes.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeCapacity)> {
        self.nodes.iter().map(|(name, capacity)| (name.as_str(), capacity))
    }
}
