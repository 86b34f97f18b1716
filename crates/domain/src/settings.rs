//! JSON settings exchange format.
//!
//! Mirrors the document written by the planner front end:
//!
//! ```json
//! {
//!   "initialDeposit": 400,
//!   "targetDeposit": 100000,
//!   "initialRiskPercent": 10,
//!   "tradingPairs": [
//!     { "pair": "XAIUSDT", "active": true, "ev": 0.575, "winrate": 31.5,
//!       "rr": 4, "monthlyTrades": 42, "color": "#FF8042" }
//!   ],
//!   "scenarioType": "realistic",
//!   "monthlyDeposit": 0
//! }
//! ```
//!
//! Missing top-level fields fall back to [`Settings::default`].

use crate::config::Config;
use crate::entities::Instrument;
use crate::enums::Scenario;
use crate::error::{AllocationError, SettingsError};
use crate::math::allocation::allocate_risk;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of `tradingPairs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSettings {
    pub pair: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub ev: Decimal,
    #[serde(rename = "winrate", with = "rust_decimal::serde::float")]
    pub win_rate: Decimal,
    #[serde(rename = "rr", with = "rust_decimal::serde::float")]
    pub reward_risk: Decimal,
    pub monthly_trades: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Last computed allocation share. Informational; recomputed on demand.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub allocation_percent: Option<Decimal>,
}

fn default_active() -> bool {
    true
}

impl PairSettings {
    fn new(pair: &str, ev: Decimal, win_rate: Decimal, reward_risk: Decimal, trades: u32, color: &str) -> Self {
        Self {
            pair: pair.to_string(),
            active: true,
            ev,
            win_rate,
            reward_risk,
            monthly_trades: trades,
            color: Some(color.to_string()),
            allocation_percent: None,
        }
    }

    /// Converts to a domain instrument, deriving EV when it is zero.
    pub fn to_instrument(&self) -> Instrument {
        let mut instrument = Instrument::with_derived_ev(
            self.pair.clone(),
            self.ev,
            self.win_rate,
            self.reward_risk,
            self.monthly_trades,
        );
        instrument.active = self.active;
        instrument.color = self.color.clone();
        instrument
    }

    pub fn from_instrument(instrument: &Instrument) -> Self {
        Self {
            pair: instrument.symbol.clone(),
            active: instrument.active,
            ev: instrument.ev,
            win_rate: instrument.win_rate,
            reward_risk: instrument.reward_risk,
            monthly_trades: instrument.monthly_trade_count,
            color: instrument.color.clone(),
            allocation_percent: None,
        }
    }
}

/// The persisted planner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_deposit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_deposit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_risk_percent: Decimal,
    pub trading_pairs: Vec<PairSettings>,
    pub scenario_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_deposit: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_deposit: Decimal::new(400, 0),
            target_deposit: Decimal::new(100_000, 0),
            initial_risk_percent: Decimal::new(10, 0),
            trading_pairs: vec![
                PairSettings::new("XAIUSDT", Decimal::new(575, 3), Decimal::new(315, 1), Decimal::new(4, 0), 42, "#FF8042"),
                PairSettings::new("PEOPLEUSDT", Decimal::new(528, 3), Decimal::new(382, 1), Decimal::new(3, 0), 51, "#00C49F"),
                PairSettings::new("SPXUSDT", Decimal::new(401, 3), Decimal::new(467, 1), Decimal::new(2, 0), 61, "#0088FE"),
                PairSettings::new("AI16ZUSDT", Decimal::new(29, 2), Decimal::new(43, 0), Decimal::new(2, 0), 61, "#FFBB28"),
            ],
            scenario_type: Scenario::Realistic.as_str().to_string(),
            monthly_deposit: Decimal::ZERO,
        }
    }
}

impl Settings {
    /// Parses a settings document.
    ///
    /// # Errors
    /// Returns [`SettingsError::Json`] when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to indented JSON.
    ///
    /// # Errors
    /// Returns [`SettingsError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn scenario(&self) -> Result<Scenario, SettingsError> {
        self.scenario_type.parse()
    }

    /// Builds a plan configuration anchored at `start_date`.
    ///
    /// The result is not validated; call [`Config::validate`] before use.
    ///
    /// # Errors
    /// Returns [`SettingsError::UnknownScenario`] for an unrecognized scenario name.
    pub fn into_config(self, start_date: NaiveDate) -> Result<Config, SettingsError> {
        let scenario = self.scenario()?;
        let instruments = self.trading_pairs.iter().map(PairSettings::to_instrument).collect();

        Ok(Config::new(self.initial_deposit, self.target_deposit, self.initial_risk_percent)
            .with_instruments(instruments)
            .with_monthly_contribution(self.monthly_deposit)
            .with_scenario(scenario)
            .with_start_date(start_date))
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_deposit: config.initial_deposit,
            target_deposit: config.target_deposit,
            initial_risk_percent: config.base_risk_percent,
            trading_pairs: config.instruments.iter().map(PairSettings::from_instrument).collect(),
            scenario_type: config.scenario.as_str().to_string(),
            monthly_deposit: config.monthly_contribution,
        }
    }

    /// Fills `allocationPercent` of every pair for the initial deposit.
    ///
    /// Inactive pairs are cleared.
    ///
    /// # Errors
    /// Returns [`AllocationError::DegenerateEv`] when the active EV sum is not positive.
    pub fn refresh_allocations(&mut self) -> Result<(), AllocationError> {
        let instruments: Vec<Instrument> =
            self.trading_pairs.iter().map(PairSettings::to_instrument).collect();
        let allocation = allocate_risk(self.initial_deposit, self.initial_risk_percent, &instruments)?;
        for (pair, entry) in self.trading_pairs.iter_mut().zip(&allocation.entries) {
            pair.allocation_percent = entry.allocation_percent.map(|pct| pct.round_dp(1));
        }
        Ok(())
    }
}
