//! rsched-core — capacity-aware node ranking for service placement.
//!
//! The host orchestrator (e.g. an HA manager) keeps a [`StaticScheduler`]
//! in sync with the services it starts, stops and migrates, and asks it
//! right before each placement how desirable every node is. The crate
//! does not place, migrate or persist anything itself.
//!
//! # Components
//!
//! - **`registry`** — node capacity and membership
//! - **`ledger`** — one usage record per service (node + footprint)
//! - **`scorer`** — per-node scores for a candidate footprint
//! - **`topsis`** — the multi-criteria ranking behind the scorer
//! - **`scheduler`** — the facade owning all mutable state
//! - **`config`** / **`snapshot`** — TOML weights and persistable state
//!
//! # Architecture
//!
//! ```text
//! StaticScheduler
//!   ├── NodeRegistry  (node → capacity)
//!   ├── UsageLedger   (service → node + footprint)
//!   └── ScoringEngine (read-only view of both → (node, score))
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod scheduler;
pub mod scorer;
pub mod snapshot;
pub mod topsis;
pub mod types;

pub use config::SchedulerConfig;
pub use error::{SchedulingError, SchedulingResult};
pub use ledger::UsageLedger;
pub use registry::NodeRegistry;
pub use scheduler::StaticScheduler;
pub use scorer::{NodeScore, ScoreBreakdown, ScoringEngine, ScoringWeights, prefer, rank_nodes};
pub use snapshot::{NodeEntry, SchedulerSnapshot, ServiceEntry};
pub use types::*;
