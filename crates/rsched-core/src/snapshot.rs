//! Persistable scheduler state.
//!
//! The scheduler never writes anything itself. Hosts take a
//! [`SchedulerSnapshot`], store it however they like (JSON, TOML) and
//! replay it later with [`StaticScheduler::restore`](crate::StaticScheduler::restore).

use serde::{Deserialize, Serialize};

use crate::types::{NodeName, ServiceFootprint, ServiceId};

/// One registered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub name: NodeName,
    pub cpu: u32,
    pub memory: u64,
}

/// One usage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    pub id: ServiceId,
    pub node: NodeName,
    pub footprint: ServiceFootprint,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSnapshot {
    pub nodes: Vec<NodeEntry>,
    pub services: Vec<ServiceEntry>,
}

impl SchedulerSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
