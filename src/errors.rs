//! Error types shared by the instance reader, the LP preprocessing and the engine configuration.

use std::path::PathBuf;

/// Everything that can stop a single instance from being solved. None of these are fatal to a
/// batch, the runner reports them and moves on to the next instance.
#[derive(Debug, thiserror::Error)]
pub enum MkpError {
    /// The instance file could not be opened or read
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The instance file ended early or held a non numeric token
    #[error("error reading {}: {field}", .path.display())]
    FileFormat { path: PathBuf, field: String },
    /// The instance data is inconsistent (sizes, negative data, limits)
    #[error("invalid instance: {0}")]
    InvalidInstance(String),
    /// The LP relaxation was proven primal infeasible
    #[error("LP relaxation proven primal infeasible")]
    RelaxationInfeasible,
    /// The LP relaxation was proven dual infeasible (unbounded)
    #[error("LP relaxation proven dual infeasible")]
    RelaxationUnbounded,
    /// The LP solver hit its iteration or time limit
    #[error("LP relaxation iteration limit reached")]
    RelaxationIterationLimit,
    /// Any other LP termination status
    #[error("LP relaxation failed: {0}")]
    RelaxationFailed(String),
    /// The engine parameters are out of range
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type MkpResult<T> = Result<T, MkpError>;
