//! Error types for the static scheduler.

use thiserror::Error;

/// Result type alias for scheduler operations.
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Errors that can occur while mutating or configuring a scheduler.
///
/// Overcommit, duplicate service ids and removal of unknown entries are
/// not errors. They are legal states handled by scoring or as no-ops.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("node '{0}' not present in scheduler")]
    UnknownNode(String),

    #[error("invalid capacity for node '{node}': {reason}")]
    InvalidCapacity { node: String, reason: String },

    #[error("invalid service footprint: {0}")]
    InvalidFootprint(String),

    #[error("invalid scoring criteria: {0}")]
    InvalidCriteria(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
