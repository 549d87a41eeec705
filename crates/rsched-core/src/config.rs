//! Scheduler configuration (TOML).
//!
//! ```toml
//! [scoring]
//! average_cpu = 1.0
//! highest_cpu = 2.0
//! average_memory = 5.0
//! highest_memory = 10.0
//! ```
//!
//! Every key is optional and falls back to [`ScoringWeights::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SchedulingError, SchedulingResult};
use crate::scorer::ScoringWeights;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub scoring: ScoringWeights,
}

impl SchedulerConfig {
    pub fn from_file(path: &Path) -> SchedulingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SchedulingResult<Self> {
        toml::from_str(content).map_err(|e| SchedulingError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SchedulingResult<String> {
        toml::to_string_pretty(self).map_err(|e| SchedulingError::Config(e.to_string()))
    }
}
