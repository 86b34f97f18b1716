//! Domain model for trading-account growth planning.
//!
//! This crate holds the pure part of the planner:
//! - Instruments, scenarios and the plan configuration
//! - The deposit risk curve and EV-proportional risk allocation
//! - Fee, drawdown, loss-streak and ruin-risk metrics
//! - Result value objects shared by the projection and simulation engines
//! - The JSON settings exchange format

/// Plan configuration.
pub mod config;
/// Domain entities.
pub mod entities;
/// Scenario and outcome enums.
pub mod enums;
/// Error types.
pub mod error;
/// Risk sizing math.
pub mod math;
/// Derived account metrics.
pub mod metrics;
/// Settings exchange format.
pub mod settings;
/// Result value objects.
pub mod value_objects;
