//! Error types shared by the domain layer.

use rust_decimal::Decimal;
use thiserror::Error;

/// A malformed plan configuration. Raised before any computation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Initial deposit is zero or negative.
    #[error("initial deposit must be positive, got {0}")]
    NonPositiveDeposit(Decimal),
    /// Target deposit does not exceed the initial deposit.
    #[error("target deposit {target} must be greater than initial deposit {initial}")]
    TargetNotAboveInitial {
        /// Initial deposit.
        initial: Decimal,
        /// Requested target.
        target: Decimal,
    },
    /// Base risk percentage outside `[0, 100]`.
    #[error("base risk percent must be within [0, 100], got {0}")]
    RiskPercentOutOfRange(Decimal),
    /// Monthly contribution below zero.
    #[error("monthly contribution cannot be negative, got {0}")]
    NegativeContribution(Decimal),
    /// The plan lists no instruments at all.
    #[error("at least one instrument is required")]
    NoInstruments,
    /// An instrument carries unusable parameters.
    #[error("instrument {symbol} is invalid: {reason}")]
    InvalidInstrument {
        /// Instrument symbol.
        symbol: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Projection or simulation horizon of zero months.
    #[error("horizon must be at least one month")]
    ZeroHorizon,
    /// Monte Carlo run with no iterations.
    #[error("iteration count must be at least one")]
    ZeroIterations,
}

/// Proportional risk allocation is undefined for the given instrument set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Summed EV of the active instruments is zero or negative.
    #[error("total EV of active instruments must be positive, got {total_ev}")]
    DegenerateEv {
        /// Sum of EV over active instruments.
        total_ev: Decimal,
    },
}

/// Failure reading or writing the settings exchange format.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("invalid settings document: {0}")]
    Json(#[from] serde_json::Error),
    /// Unrecognized scenario name.
    #[error("unknown scenario type: {0}")]
    UnknownScenario(String),
}
