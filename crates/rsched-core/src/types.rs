//! Domain types shared by the registry, the ledger and the scoring engine.
//!
//! All types are serializable so the host can persist scheduler state
//! (see [`crate::snapshot`]) and feed scenarios from files.

use serde::{Deserialize, Serialize};

use crate::error::{SchedulingError, SchedulingResult};

/// Unique name of a node in the scheduling domain.
pub type NodeName = String;

/// Globally unique identifier of a service (VM or container).
pub type ServiceId = String;

// ── Footprint ──────────────────────────────────────────────────────

/// Resource footprint requested by a service.
///
/// Fixed shape: a CPU request (possibly fractional, e.g. a 0.5 core limit)
/// and a memory request in bytes. Values are never checked against any
/// node's capacity; overcommit is legal and only lowers a node's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FootprintRepr")]
pub struct ServiceFootprint {
    cpu: f64,
    memory: u64,
}

/// Wire shape of a footprint, validated on the way in.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FootprintRepr {
    cpu: f64,
    memory: u64,
}

impl TryFrom<FootprintRepr> for ServiceFootprint {
    type Error = SchedulingError;

    fn try_from(repr: FootprintRepr) -> SchedulingResult<Self> {
        ServiceFootprint::new(repr.cpu, repr.memory)
    }
}

impl ServiceFootprint {
    /// Largest CPU request accepted, the same bound as a node's CPU capacity.
    ///
    /// Keeps squared utilization fractions finite during scoring.
    pub const MAX_CPU: f64 = u32::MAX as f64;

    /// Create a footprint. `cpu` must be finite, non-negative and at most
    /// [`Self::MAX_CPU`].
    pub fn new(cpu: f64, memory: u64) -> SchedulingResult<Self> {
        if !cpu.is_finite() || cpu < 0.0 {
            return Err(SchedulingError::InvalidFootprint(format!(
                "cpu request must be a finite, non-negative number, got {cpu}"
            )));
        }
        if cpu > Self::MAX_CPU {
            return Err(SchedulingError::InvalidFootprint(format!(
                "cpu request {cpu} exceeds the maximum of {}",
                Self::MAX_CPU
            )));
        }
        Ok(Self { cpu, memory })
    }

    /// Footprint from whole CPU units, which cannot fail.
    pub fn whole(cpu: u32, memory: u64) -> Self {
        Self {
            cpu: f64::from(cpu),
            memory,
        }
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn memory(&self) -> u64 {
        self.memory
    }
}

// ── Node ───────────────────────────────────────────────────────────

/// Static capacity of a node. Both dimensions are strictly positive once
/// accepted by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCapacity {
    /// CPU units (threads).
    pub cpu: u32,
    /// Memory in bytes.
    pub memory: u64,
}

/// Aggregate usage reserved on one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeUsage {
    pub cpu: f64,
    pub memory: u64,
    /// Number of usage records hosted on the node.
    pub services: usize,
}

impl NodeUsage {
    /// Account one more footprint. Memory saturates instead of wrapping.
    pub fn add(&mut self, footprint: &ServiceFootprint) {
        self.cpu += footprint.cpu();
        self.memory = self.memory.saturating_add(footprint.memory());
        self.services += 1;
    }
}

// ── Usage record ───────────────────────────────────────────────────

/// Binding of one service to its hosting node plus the reserved footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub service_id: ServiceId,
    pub node: NodeName,
    pub footprint: ServiceFootprint,
}
