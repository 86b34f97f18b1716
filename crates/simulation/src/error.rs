//! Error type for projection and simulation runs.

use thiserror::Error;
use tradeplan_domain::error::{AllocationError, ValidationError};

/// Reasons a projection or simulation run produces no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The configuration was rejected before computation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Proportional risk allocation is undefined.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    /// Another simulation is already running.
    #[error("a simulation is already in progress")]
    Busy,
    /// The run was cancelled and its partial results discarded.
    #[error("simulation cancelled")]
    Cancelled,
}
