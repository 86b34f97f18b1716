use crate::error::SettingsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market scenario applied to the deterministic projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Pessimistic,
    #[default]
    Realistic,
    Optimistic,
}

impl Scenario {
    /// Multiplier applied to the win rate in deterministic mode.
    pub fn win_rate_multiplier(&self) -> Decimal {
        match self {
            Scenario::Pessimistic => Decimal::new(8, 1),
            Scenario::Realistic => Decimal::ONE,
            Scenario::Optimistic => Decimal::new(12, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Pessimistic => "pessimistic",
            Scenario::Realistic => "realistic",
            Scenario::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pessimistic" => Ok(Scenario::Pessimistic),
            "realistic" => Ok(Scenario::Realistic),
            "optimistic" => Ok(Scenario::Optimistic),
            other => Err(SettingsError::UnknownScenario(other.to_string())),
        }
    }
}

/// Terminal state of a deterministic projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionOutcome {
    /// Deposit met or exceeded the target.
    TargetReached,
    /// Horizon ran out before the target was met.
    HorizonExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_multipliers() {
        assert_eq!(Scenario::Pessimistic.win_rate_multiplier(), dec!(0.8));
        assert_eq!(Scenario::Realistic.win_rate_multiplier(), dec!(1));
        assert_eq!(Scenario::Optimistic.win_rate_multiplier(), dec!(1.2));
    }

    #[test]
    fn test_scenario_parse() {
        assert_eq!("Optimistic".parse::<Scenario>().unwrap(), Scenario::Optimistic);
        assert!("bullish".parse::<Scenario>().is_err());
    }
}
