//! Error types for the bin-packing solver.

use thiserror::Error;
use xap_capacity::CapacityError;

/// Result type alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Invalid configuration or malformed targets.
///
/// Running out of capacity is not an error; see [`crate::ScaleOutcome`].
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("container memory capacity must be positive")]
    ZeroContainerMemory,

    #[error(
        "maximum memory per machine ({per_machine_mb}MB) is below one container ({container_memory_mb}MB)"
    )]
    PerMachineBelowContainer {
        per_machine_mb: u64,
        container_memory_mb: u64,
    },

    #[error("allocated memory {allocated_mb}MB already exceeds the maximum of {max_mb}MB")]
    AllocatedExceedsMaximum { allocated_mb: u64, max_mb: u64 },

    #[error(
        "target memory {memory_mb}MB is not a multiple of the container memory {container_memory_mb}MB"
    )]
    NotContainerMultiple {
        memory_mb: u64,
        container_memory_mb: u64,
    },

    #[error("target requests {0} cpu cores without any memory")]
    CpuWithoutMemory(String),

    #[error("target of {0} containers is too large")]
    TooManyContainers(u64),

    #[error("invalid solver config: {0}")]
    Config(String),

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}
