//! Per-instrument monthly trade outcomes.
//!
//! [`ExpectedOutcome`] produces the deterministic expectation used by the
//! projection engine; [`SampledOutcome`] draws every trade from an injected
//! random stream for Monte Carlo runs.

use rand::Rng;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use tradeplan_domain::entities::Instrument;
use tradeplan_domain::enums::Scenario;

/// Result of one instrument's trades for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeOutcome {
    pub win_trades: u32,
    pub loss_trades: u32,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
}

impl TradeOutcome {
    /// Builds the outcome of `wins` winning trades out of `trades`.
    pub fn from_wins(wins: u32, trades: u32, risk_amount: Decimal, reward_risk: Decimal) -> Self {
        let losses = trades.saturating_sub(wins);
        Self {
            win_trades: wins,
            loss_trades: losses,
            gross_profit: Decimal::from(wins) * risk_amount * reward_risk,
            gross_loss: Decimal::from(losses) * risk_amount,
        }
    }

    pub fn trades(&self) -> u32 {
        self.win_trades + self.loss_trades
    }

    pub fn profit(&self) -> Decimal {
        self.gross_profit - self.gross_loss
    }
}

/// Source of monthly trade outcomes.
pub trait TradeOutcomeModel {
    /// Outcome of `instrument`'s monthly trades, each risking `risk_amount`.
    fn outcome(&mut self, instrument: &Instrument, risk_amount: Decimal) -> TradeOutcome;
}

/// Deterministic expectation with a scenario-adjusted win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedOutcome {
    multiplier: Decimal,
}

impl ExpectedOutcome {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            multiplier: scenario.win_rate_multiplier(),
        }
    }

    /// Scenario-adjusted win probability, clamped to `[0, 1]`.
    pub fn win_probability(&self, instrument: &Instrument) -> Decimal {
        (instrument.win_probability() * self.multiplier).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

impl TradeOutcomeModel for ExpectedOutcome {
    fn outcome(&mut self, instrument: &Instrument, risk_amount: Decimal) -> TradeOutcome {
        let trades = instrument.monthly_trade_count;
        let wins = (Decimal::from(trades) * self.win_probability(instrument))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
            .min(trades);
        TradeOutcome::from_wins(wins, trades, risk_amount, instrument.reward_risk)
    }
}

/// Independent Bernoulli draw per trade.
#[derive(Debug, Clone)]
pub struct SampledOutcome<R: Rng> {
    rng: R,
}

impl<R: Rng> SampledOutcome<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TradeOutcomeModel for SampledOutcome<R> {
    fn outcome(&mut self, instrument: &Instrument, risk_amount: Decimal) -> TradeOutcome {
        let p = instrument.win_probability().to_f64().unwrap_or(0.0);
        let trades = instrument.monthly_trade_count;
        let wins = (0..trades)
            .filter(|_| self.rng.random::<f64>() < p)
            .count() as u32;
        TradeOutcome::from_wins(wins, trades, risk_amount, instrument.reward_risk)
    }
}
