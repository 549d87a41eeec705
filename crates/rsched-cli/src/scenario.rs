//! Scenario files: a scheduler state plus the service about to be placed.
//!
//! ```toml
//! [scoring]
//! highest_memory = 10.0
//!
//! [[nodes]]
//! name = "A"
//! cpu = 10
//! memory = 100000000000
//!
//! [[services]]
//! id = "vm:100"
//! node = "A"
//! footprint = { cpu = 4, memory = 20000000000 }
//!
//! [candidate]
//! cpu = 4
//! memory = 20000000000
//! ```
//!
//! Files ending in `.json` are read as JSON with the same layout.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use rsched_core::{
    NodeEntry, SchedulerConfig, SchedulerSnapshot, ScoringWeights, ServiceEntry, ServiceFootprint,
    StaticScheduler,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
    pub candidate: ServiceFootprint,
}

impl Scenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let scenario = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing JSON scenario {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("parsing TOML scenario {}", path.display()))?
        };
        Ok(scenario)
    }

    pub fn config(&self) -> SchedulerConfig {
        SchedulerConfig {
            scoring: self.scoring.clone(),
        }
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            nodes: self.nodes.clone(),
            services: self.services.clone(),
        }
    }

    /// Build the scheduler described by the scenario.
    pub fn scheduler(&self) -> anyhow::Result<StaticScheduler> {
        let scheduler = StaticScheduler::restore(&self.snapshot(), &self.config())
            .context("building scheduler from scenario")?;
        Ok(scheduler)
    }
}
