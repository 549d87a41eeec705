//! Node scoring for service placement.
//!
//! For every registered node the engine builds one alternative: "the
//! candidate runs on this node, everything else stays as it is". Each
//! alternative is described by four cost criteria over the projected
//! per-node utilization fractions of the whole domain:
//!
//! - **average CPU** — quadratic mean of CPU fractions
//! - **highest CPU** — the most loaded node's CPU fraction
//! - **average memory** — quadratic mean of memory fractions
//! - **highest memory** — the most loaded node's memory fraction
//!
//! Alternatives are ranked with [TOPSIS](crate::topsis). Fractions are
//! not clamped, so overcommitted nodes get a poor score instead of an
//! error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchedulingError, SchedulingResult};
use crate::ledger::UsageLedger;
use crate::registry::NodeRegistry;
use crate::topsis::{self, Criteria, Criterion, Matrix};
use crate::types::{NodeCapacity, NodeName, NodeUsage, ServiceFootprint};

const N_CRITERIA: usize = 4;

/// Relative importance of the four criteria. Higher means the engine
/// tries harder to keep that value low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    pub average_cpu: f64,
    pub highest_cpu: f64,
    pub average_memory: f64,
    pub highest_memory: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        // Memory cannot be overcommitted as safely as CPU.
        Self {
            average_cpu: 1.0,
            highest_cpu: 2.0,
            average_memory: 5.0,
            highest_memory: 10.0,
        }
    }
}

impl ScoringWeights {
    fn criteria(&self) -> SchedulingResult<Criteria<N_CRITERIA>> {
        let named = [
            ("average CPU", self.average_cpu),
            ("highest CPU", self.highest_cpu),
            ("average memory", self.average_memory),
            ("highest memory", self.highest_memory),
        ];
        if let Some((name, weight)) = named.iter().find(|(_, w)| *w < 0.0) {
            return Err(SchedulingError::InvalidCriteria(format!(
                "weight of '{name}' must not be negative, got {weight}"
            )));
        }

        // All four are cost criteria.
        Criteria::new(named.map(|(name, weight)| Criterion::new(name, -weight)))
    }
}

/// Criteria values of one alternative, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub average_cpu: f64,
    pub highest_cpu: f64,
    pub average_memory: f64,
    pub highest_memory: f64,
}

impl ScoreBreakdown {
    fn as_row(&self) -> [f64; N_CRITERIA] {
        [
            self.average_cpu,
            self.highest_cpu,
            self.average_memory,
            self.highest_memory,
        ]
    }
}

/// Scored placement result for a single node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeScore {
    pub node: NodeName,
    /// Higher is better. Range: 0.0..=1.0.
    pub score: f64,
    pub capacity: NodeCapacity,
    pub breakdown: ScoreBreakdown,
}

/// Order two scored nodes, most preferred first.
///
/// Score decides. On an exact tie the node with more capacity wins
/// (memory first, then CPU) since it leaves more headroom, and the node
/// name makes the order total.
pub fn prefer(a: &NodeScore, b: &NodeScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.capacity.memory.cmp(&a.capacity.memory))
        .then_with(|| b.capacity.cpu.cmp(&a.capacity.cpu))
        .then_with(|| a.node.cmp(&b.node))
}

/// Sort scored nodes best first using [`prefer`].
pub fn rank_nodes(mut scores: Vec<NodeScore>) -> Vec<NodeScore> {
    scores.sort_by(prefer);
    scores
}

/// Stateless scorer holding the validated criteria.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: ScoringWeights,
    criteria: Criteria<N_CRITERIA>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringWeights::default()).expect("default scoring weights are valid")
    }
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> SchedulingResult<Self> {
        let criteria = weights.criteria()?;
        Ok(Self { weights, criteria })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score every registered node for starting a service with `footprint`,
    /// as if the service were already running there.
    ///
    /// Results follow registry (name) order. Neither input is modified.
    pub fn evaluate(
        &self,
        registry: &NodeRegistry,
        ledger: &UsageLedger,
        footprint: &ServiceFootprint,
    ) -> Vec<NodeScore> {
        if registry.is_empty() {
            return Vec::new();
        }

        let totals = ledger.aggregate();
        let nodes: Vec<(&str, NodeCapacity, NodeUsage)> = registry
            .iter()
            .map(|(name, capacity)| {
                let usage = totals.get(name).copied().unwrap_or_default();
                (name, *capacity, usage)
            })
            .collect();

        let breakdowns: Vec<ScoreBreakdown> = (0..nodes.len())
            .map(|target| project(&nodes, target, footprint))
            .collect();

        let matrix = Matrix::new(breakdowns.iter().map(ScoreBreakdown::as_row).collect());
        let scores = topsis::score_alternatives(&matrix, &self.criteria);

        debug!(
            nodes = nodes.len(),
            cpu = footprint.cpu(),
            memory = footprint.memory(),
            "scored nodes for service start"
        );

        nodes
            .iter()
            .zip(breakdowns)
            .zip(scores)
            .map(|(((name, capacity, _), breakdown), score)| NodeScore {
                node: name.to_string(),
                score,
                capacity: *capacity,
                breakdown,
            })
            .collect()
    }

    /// `(node, score)` pairs for every registered node, unordered.
    pub fn score_nodes(
        &self,
        registry: &NodeRegistry,
        ledger: &UsageLedger,
        footprint: &ServiceFootprint,
    ) -> Vec<(NodeName, f64)> {
        self.evaluate(registry, ledger, footprint)
            .into_iter()
            .map(|s| (s.node, s.score))
            .collect()
    }
}

/// Criteria of the alternative that places `footprint` on `nodes[target]`.
fn project(
    nodes: &[(&str, NodeCapacity, NodeUsage)],
    target: usize,
    footprint: &ServiceFootprint,
) -> ScoreBreakdown {
    let mut squares_cpu = 0.0;
    let mut highest_cpu: f64 = 0.0;
    let mut squares_memory = 0.0;
    let mut highest_memory: f64 = 0.0;

    for (index, (_, capacity, usage)) in nodes.iter().enumerate() {
        let (mut cpu, mut memory) = (usage.cpu, usage.memory);
        if index == target {
            cpu += footprint.cpu();
            memory = memory.saturating_add(footprint.memory());
        }

        let cpu = cpu / f64::from(capacity.cpu);
        let memory = memory as f64 / capacity.memory as f64;

        squares_cpu += cpu * cpu;
        highest_cpu = highest_cpu.max(cpu);
        squares_memory += memory * memory;
        highest_memory = highest_memory.max(memory);
    }

    let len = nodes.len() as f64;

    // The 1.0 offset keeps small absolute differences from being blown up
    // by normalization: 0.004 is twice 0.002, but 1.004 is barely above 1.002.
    ScoreBreakdown {
        average_cpu: 1.0 + (squares_cpu / len).sqrt(),
        highest_cpu: 1.0 + highest_cpu,
        average_memory: 1.0 + (squares_memory / len).sqrt(),
        highest_memory: 1.0 + highest_memory,
    }
}
