//! Static scheduler — the facade the host orchestrator talks to.
//!
//! Owns the node registry and the usage ledger and hands read-only views
//! of both to the scoring engine. The scheduler does no locking: a host
//! sharing one instance between threads wraps it in a `Mutex` (or keeps
//! it on a single task) and serializes every call itself.

use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::error::SchedulingResult;
use crate::ledger::UsageLedger;
use crate::registry::NodeRegistry;
use crate::scorer::{self, NodeScore, ScoringEngine};
use crate::snapshot::{NodeEntry, SchedulerSnapshot, ServiceEntry};
use crate::types::{NodeCapacity, NodeName, NodeUsage, ServiceFootprint, ServiceId, UsageRecord};

#[derive(Debug, Clone, Default)]
pub struct StaticScheduler {
    registry: NodeRegistry,
    ledger: UsageLedger,
    engine: ScoringEngine,
}

impl StaticScheduler {
    /// Empty scheduler with the default scoring weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty scheduler with custom scoring weights.
    pub fn with_config(config: &SchedulerConfig) -> SchedulingResult<Self> {
        Ok(Self {
            registry: NodeRegistry::new(),
            ledger: UsageLedger::new(),
            engine: ScoringEngine::new(config.scoring.clone())?,
        })
    }

    /// Rehydrate the node set from `(name, cpu, memory)` tuples.
    pub fn from_nodes<I, S>(nodes: I) -> SchedulingResult<Self>
    where
        I: IntoIterator<Item = (S, u32, u64)>,
        S: Into<NodeName>,
    {
        let mut scheduler = Self::new();
        for (name, cpu, memory) in nodes {
            scheduler.add_node(name, cpu, memory)?;
        }
        Ok(scheduler)
    }

    /// Rebuild a scheduler from a snapshot taken with [`Self::snapshot`].
    ///
    /// Nodes are added first, then services. Any invalid entry aborts the
    /// restore.
    pub fn restore(
        snapshot: &SchedulerSnapshot,
        config: &SchedulerConfig,
    ) -> SchedulingResult<Self> {
        let mut scheduler = Self::with_config(config)?;
        for node in &snapshot.nodes {
            scheduler.add_node(node.name.clone(), node.cpu, node.memory)?;
        }
        for service in &snapshot.services {
            scheduler.add_service_usage_to_node(
                &service.node,
                service.id.clone(),
                service.footprint,
            )?;
        }
        debug!(
            nodes = scheduler.node_count(),
            services = scheduler.service_count(),
            "scheduler restored from snapshot"
        );
        Ok(scheduler)
    }

    /// Capture nodes and usage records, sorted by name and service id.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            nodes: self
                .registry
                .iter()
                .map(|(name, capacity)| NodeEntry {
                    name: name.to_string(),
                    cpu: capacity.cpu,
                    memory: capacity.memory,
                })
                .collect(),
            services: self
                .ledger
                .iter()
                .map(|record| ServiceEntry {
                    id: record.service_id.clone(),
                    node: record.node.clone(),
                    footprint: record.footprint,
                })
                .collect(),
        }
    }

    // ── Nodes ──────────────────────────────────────────────────────

    /// Add a node, or replace its capacity if it is already registered.
    /// Usage records on a re-added node are kept.
    pub fn add_node(
        &mut self,
        name: impl Into<NodeName>,
        cpu: u32,
        memory: u64,
    ) -> SchedulingResult<()> {
        self.registry.add_node(name, cpu, memory)?;
        Ok(())
    }

    /// Remove a node together with every usage record it still hosts.
    /// Unknown names are a no-op.
    pub fn remove_node(&mut self, name: &str) {
        if self.registry.remove_node(name).is_none() {
            return;
        }

        let orphaned = self.ledger.remove_node_usage(name);
        if !orphaned.is_empty() {
            let services: Vec<&str> = orphaned.iter().map(|r| r.service_id.as_str()).collect();
            warn!(
                node = %name,
                count = orphaned.len(),
                ?services,
                "removed node still hosted services, dropping their usage"
            );
        }
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.registry.contains_node(name)
    }

    /// Names of all registered nodes, sorted.
    pub fn list_nodes(&self) -> Vec<NodeName> {
        self.registry.list_nodes()
    }

    pub fn node_capacity(&self, name: &str) -> Option<NodeCapacity> {
        self.registry.capacity(name)
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    // ── Usage ──────────────────────────────────────────────────────

    /// Record `service_id` as running on `node`. An existing record for the
    /// same id is replaced, which models a migration.
    pub fn add_service_usage_to_node(
        &mut self,
        node: &str,
        service_id: impl Into<ServiceId>,
        footprint: ServiceFootprint,
    ) -> SchedulingResult<()> {
        self.ledger
            .add_service_usage_to_node(&self.registry, node, service_id, footprint)?;
        Ok(())
    }

    /// Forget a service's usage. Returns the removed record, if any.
    pub fn remove_service_usage(&mut self, service_id: &str) -> Option<UsageRecord> {
        self.ledger.remove_service_usage(service_id)
    }

    pub fn service_usage(&self, service_id: &str) -> Option<&UsageRecord> {
        self.ledger.get(service_id)
    }

    /// Aggregate usage of a registered node, `None` for unknown nodes.
    pub fn usage_of_node(&self, name: &str) -> Option<NodeUsage> {
        self.registry
            .contains_node(name)
            .then(|| self.ledger.usage_of_node(name))
    }

    pub fn service_count(&self) -> usize {
        self.ledger.len()
    }

    // ── Scoring ────────────────────────────────────────────────────

    /// Score all nodes for starting a service with `footprint`, as if it
    /// were already running on each.
    ///
    /// Returns one `(node, score)` pair per registered node in no
    /// particular order. Scores are between 0.0 and 1.0, higher is better.
    pub fn score_nodes_to_start_service(
        &self,
        footprint: &ServiceFootprint,
    ) -> Vec<(NodeName, f64)> {
        self.engine.score_nodes(&self.registry, &self.ledger, footprint)
    }

    /// Like [`Self::score_nodes_to_start_service`], sorted best first with
    /// the capacity tie-break of [`scorer::prefer`].
    pub fn rank_nodes_to_start_service(&self, footprint: &ServiceFootprint) -> Vec<NodeScore> {
        scorer::rank_nodes(self.engine.evaluate(&self.registry, &self.ledger, footprint))
    }

    /// The most preferred node, `None` when no node is registered.
    pub fn best_node_to_start_service(&self, footprint: &ServiceFootprint) -> Option<NodeName> {
        self.rank_nodes_to_start_service(footprint)
            .into_iter()
            .next()
            .map(|s| s.node)
    }
}
