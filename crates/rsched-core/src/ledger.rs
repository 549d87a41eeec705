//! Usage ledger — which node hosts each service and what it reserved.
//!
//! There is at most one record per service id. Adding a record for an id
//! that already exists replaces node and footprint in one step, which is
//! how a migration is modeled.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{SchedulingError, SchedulingResult};
use crate::registry::NodeRegistry;
use crate::types::{NodeUsage, ServiceFootprint, ServiceId, UsageRecord};

#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    records: BTreeMap<ServiceId, UsageRecord>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `service_id` runs on `node` with `footprint`.
    ///
    /// Fails with [`SchedulingError::UnknownNode`] if the node is not in
    /// `registry`; the ledger is left untouched in that case. Returns the
    /// replaced record when the service was already known.
    pub fn add_service_usage_to_node(
        &mut self,
        registry: &NodeRegistry,
        node: &str,
        service_id: impl Into<ServiceId>,
        footprint: ServiceFootprint,
    ) -> SchedulingResult<Option<UsageRecord>> {
        if !registry.contains_node(node) {
            return Err(SchedulingError::UnknownNode(node.to_string()));
        }

        let service_id = service_id.into();
        let record = UsageRecord {
            service_id: service_id.clone(),
            node: node.to_string(),
            footprint,
        };
        let previous = self.records.insert(service_id.clone(), record);

        match &previous {
            Some(old) if old.node != node => debug!(
                service = %service_id,
                from = %old.node,
                to = %node,
                "service usage migrated"
            ),
            Some(_) => debug!(service = %service_id, node = %node, "service usage replaced"),
            None => debug!(
                service = %service_id,
                node = %node,
                cpu = footprint.cpu(),
                memory = footprint.memory(),
                "service usage added"
            ),
        }
        Ok(previous)
    }

    /// Remove the record for `service_id`. Unknown ids are a no-op.
    pub fn remove_service_usage(&mut self, service_id: &str) -> Option<UsageRecord> {
        let removed = self.records.remove(service_id);
        if let Some(record) = &removed {
            debug!(service = %service_id, node = %record.node, "service usage removed");
        }
        removed
    }

    /// Drop every record hosted on `node`, returning them.
    pub fn remove_node_usage(&mut self, node: &str) -> Vec<UsageRecord> {
        let ids: Vec<ServiceId> = self
            .records
            .values()
            .filter(|r| r.node == node)
            .map(|r| r.service_id.clone())
            .collect();

        ids.iter()
            .filter_map(|id| self.records.remove(id))
            .collect()
    }

    pub fn get(&self, service_id: &str) -> Option<&UsageRecord> {
        self.records.get(service_id)
    }

    /// Aggregate usage of a single node. Nodes without records report zero.
    pub fn usage_of_node(&self, node: &str) -> NodeUsage {
        let mut usage = NodeUsage::default();
        for record in self.records.values().filter(|r| r.node == node) {
            usage.add(&record.footprint);
        }
        usage
    }

    /// Aggregate usage of every node that hosts at least one record.
    ///
    /// Sums are built in service-id order on every call, so the result
    /// does not depend on the add/remove history.
    pub fn aggregate(&self) -> HashMap<&str, NodeUsage> {
        let mut totals: HashMap<&str, NodeUsage> = HashMap::new();
        for record in self.records.values() {
            totals
                .entry(record.node.as_str())
                .or_default()
                .add(&record.footprint);
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UsageRecord> {
        self.records.values()
    }
}
