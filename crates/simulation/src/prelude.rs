//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use tradeplan_simulation::prelude::*;
//! ```

// Run control
pub use crate::control::{CancellationToken, MonteCarloService, SimulationSlot, SlotGuard};

// Errors
pub use crate::error::SimulationError;

// Milestones
pub use crate::milestone::{MilestoneTracker, days_for_months, milestone_targets};

// Monte Carlo
pub use crate::monte_carlo::{MonteCarloConfig, run_monte_carlo, run_monte_carlo_with_cancel};

// Trade outcome models
pub use crate::outcome::{ExpectedOutcome, SampledOutcome, TradeOutcome, TradeOutcomeModel};

// Projection
pub use crate::projection::{ProjectionEngine, compute_projection};
