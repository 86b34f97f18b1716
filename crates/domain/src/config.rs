//! Plan configuration consumed by the projection and simulation engines.

use crate::entities::Instrument;
use crate::enums::Scenario;
use crate::error::{AllocationError, ValidationError};
use crate::metrics::fees::FeeSchedule;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default projection horizon in months.
pub const DEFAULT_HORIZON_MONTHS: u32 = 24;

/// Immutable input to a single projection or simulation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Starting account balance.
    pub initial_deposit: Decimal,
    /// Balance that ends the projection when reached.
    pub target_deposit: Decimal,
    /// Risk per month in percent of deposit, before the deposit curve.
    pub base_risk_percent: Decimal,
    /// Amount added at the start of every month.
    pub monthly_contribution: Decimal,
    pub scenario: Scenario,
    pub instruments: Vec<Instrument>,
    pub horizon_months: u32,
    /// Calendar anchor for projected milestone dates.
    pub start_date: NaiveDate,
    pub fees: FeeSchedule,
}

impl Config {
    /// Creates a config with no instruments, no contribution, realistic
    /// scenario and the default horizon.
    #[must_use]
    pub fn new(initial_deposit: Decimal, target_deposit: Decimal, base_risk_percent: Decimal) -> Self {
        Self {
            initial_deposit,
            target_deposit,
            base_risk_percent,
            monthly_contribution: Decimal::ZERO,
            scenario: Scenario::Realistic,
            instruments: Vec::new(),
            horizon_months: DEFAULT_HORIZON_MONTHS,
            start_date: NaiveDate::default(),
            fees: FeeSchedule::default(),
        }
    }

    /// Adds an instrument.
    #[must_use]
    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instruments.push(instrument);
        self
    }

    /// Replaces the instrument list.
    #[must_use]
    pub fn with_instruments(mut self, instruments: Vec<Instrument>) -> Self {
        self.instruments = instruments;
        self
    }

    /// Sets the monthly contribution.
    #[must_use]
    pub fn with_monthly_contribution(mut self, amount: Decimal) -> Self {
        self.monthly_contribution = amount;
        self
    }

    /// Sets the scenario.
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Sets the horizon.
    #[must_use]
    pub fn with_horizon(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self
    }

    /// Sets the start date.
    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    /// Sets the fee schedule.
    #[must_use]
    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Iterator over active instruments.
    pub fn active_instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter().filter(|i| i.active)
    }

    /// Checks the config before any computation.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for malformed input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.initial_deposit <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveDeposit(self.initial_deposit));
        }
        if self.target_deposit <= self.initial_deposit {
            return Err(ValidationError::TargetNotAboveInitial {
                initial: self.initial_deposit,
                target: self.target_deposit,
            });
        }
        if self.base_risk_percent < Decimal::ZERO || self.base_risk_percent > Decimal::ONE_HUNDRED {
            return Err(ValidationError::RiskPercentOutOfRange(self.base_risk_percent));
        }
        if self.monthly_contribution < Decimal::ZERO {
            return Err(ValidationError::NegativeContribution(self.monthly_contribution));
        }
        if self.instruments.is_empty() {
            return Err(ValidationError::NoInstruments);
        }
        if self.horizon_months == 0 {
            return Err(ValidationError::ZeroHorizon);
        }
        for instrument in &self.instruments {
            instrument.validate()?;
        }
        Ok(())
    }

    /// Checks that proportional allocation is defined for the active set.
    ///
    /// # Errors
    /// Returns [`AllocationError::DegenerateEv`] when active instruments exist
    /// and their EV sums to zero or less.
    pub fn validate_allocation(&self) -> Result<(), AllocationError> {
        let mut any_active = false;
        let mut total_ev = Decimal::ZERO;
        for instrument in self.active_instruments() {
            any_active = true;
            total_ev += instrument.ev;
        }
        if any_active && total_ev <= Decimal::ZERO {
            return Err(AllocationError::DegenerateEv { total_ev });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base() -> Config {
        Config::new(dec!(400), dec!(1000), dec!(10))
            .with_instrument(Instrument::new("A", dec!(0.5), dec!(50), dec!(2), 10))
    }

    #[test]
    fn test_valid_config() {
        assert!(base().validate().is_ok());
        assert!(base().validate_allocation().is_ok());
    }

    #[test]
    fn test_target_must_exceed_initial() {
        let mut config = base();
        config.target_deposit = dec!(400);
        assert_eq!(
            config.validate(),
            Err(ValidationError::TargetNotAboveInitial {
                initial: dec!(400),
                target: dec!(400)
            })
        );
    }

    #[test]
    fn test_non_positive_deposit() {
        let mut config = base();
        config.initial_deposit = Decimal::ZERO;
        assert_eq!(
            config.validate(),
            Err(ValidationError::NonPositiveDeposit(Decimal::ZERO))
        );
    }

    #[test]
    fn test_empty_instruments_rejected() {
        let config = Config::new(dec!(400), dec!(1000), dec!(10));
        assert_eq!(config.validate(), Err(ValidationError::NoInstruments));
    }

    #[test]
    fn test_all_inactive_is_valid() {
        let config = Config::new(dec!(400), dec!(1000), dec!(10))
            .with_instrument(Instrument::new("A", dec!(0.5), dec!(50), dec!(2), 10).inactive());
        assert!(config.validate().is_ok());
        assert!(config.validate_allocation().is_ok());
    }

    #[test]
    fn test_degenerate_ev_detected() {
        let config = Config::new(dec!(400), dec!(1000), dec!(10))
            .with_instrument(Instrument::new("A", dec!(-0.3), dec!(30), dec!(1), 10))
            .with_instrument(Instrument::new("B", dec!(0.1), dec!(50), dec!(1.2), 10));
        assert_eq!(
            config.validate_allocation(),
            Err(AllocationError::DegenerateEv {
                total_ev: dec!(-0.2)
            })
        );
    }
}
