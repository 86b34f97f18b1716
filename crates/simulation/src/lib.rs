//! Projection and Monte Carlo engines for trading-account growth plans.
//!
//! This crate drives the domain model month by month:
//! - Deterministic projection with milestones and drawdown tracking
//! - Stochastic Monte Carlo replay with percentile aggregation
//! - Single-flight and cancellation controls for long simulations

/// Prelude module for convenient imports.
pub mod prelude;

/// Run control.
pub mod control;
/// Simulation errors.
pub mod error;
/// Milestone generation and tracking.
pub mod milestone;
/// Monte Carlo simulator.
pub mod monte_carlo;
/// Trade outcome models.
pub mod outcome;
/// Deterministic projection engine.
pub mod projection;
