//! Deterministic month-by-month projection.

use crate::error::SimulationError;
use crate::milestone::{MilestoneTracker, date_after, days_for_months};
use crate::outcome::{ExpectedOutcome, TradeOutcomeModel};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tradeplan_domain::config::Config;
use tradeplan_domain::enums::ProjectionOutcome;
use tradeplan_domain::math::{allocate_risk, risk_amount, risk_percent};
use tradeplan_domain::metrics::DrawdownTracker;
use tradeplan_domain::value_objects::{InstrumentPerformance, MonthRecord, ProjectionResult};

/// Runs the deterministic projection for `config`.
///
/// # Errors
///
/// Returns [`SimulationError::Validation`] for a malformed config and
/// [`SimulationError::Allocation`] when the active EV sum is not positive.
/// Both are detected before the first month is computed.
pub fn compute_projection(config: &Config) -> Result<ProjectionResult, SimulationError> {
    ProjectionEngine::new(config).run()
}

/// Projection state machine over a borrowed config.
pub struct ProjectionEngine<'a, M: TradeOutcomeModel> {
    config: &'a Config,
    model: M,
}

impl<'a> ProjectionEngine<'a, ExpectedOutcome> {
    /// Creates an engine using the expected outcome for the config's scenario.
    pub fn new(config: &'a Config) -> Self {
        Self {
            model: ExpectedOutcome::new(config.scenario),
            config,
        }
    }
}

impl<'a, M: TradeOutcomeModel> ProjectionEngine<'a, M> {
    /// Creates an engine with a custom outcome model.
    pub fn with_model(config: &'a Config, model: M) -> Self {
        Self { config, model }
    }

    /// Steps month by month until the target is met or the horizon runs out.
    ///
    /// # Errors
    ///
    /// See [`compute_projection`].
    pub fn run(mut self) -> Result<ProjectionResult, SimulationError> {
        let config = self.config;
        config.validate()?;
        config.validate_allocation()?;

        info!(
            initial = %config.initial_deposit,
            target = %config.target_deposit,
            scenario = %config.scenario,
            horizon = config.horizon_months,
            "Starting projection"
        );

        let base_risk = config.base_risk_percent;
        let seed_risk = risk_percent(config.initial_deposit, base_risk);
        let mut monthly_data = vec![MonthRecord::seed(
            config.initial_deposit,
            seed_risk,
            risk_amount(config.initial_deposit, base_risk),
        )];

        let mut totals: Vec<InstrumentPerformance> = config
            .instruments
            .iter()
            .map(|i| InstrumentPerformance {
                symbol: i.symbol.clone(),
                total_profit: Decimal::ZERO,
                total_trades: 0,
                contribution_percent: Decimal::ZERO,
            })
            .collect();

        let mut drawdown = DrawdownTracker::new(config.initial_deposit);
        let mut milestones = MilestoneTracker::new(
            config.initial_deposit,
            config.target_deposit,
            config.start_date,
        );

        let mut deposit = config.initial_deposit;
        let mut month = 0;
        let mut last_risk = seed_risk;

        let outcome = loop {
            if deposit >= config.target_deposit {
                break ProjectionOutcome::TargetReached;
            }
            if month == config.horizon_months {
                break ProjectionOutcome::HorizonExhausted;
            }
            month += 1;

            if config.monthly_contribution > Decimal::ZERO {
                deposit += config.monthly_contribution;
            }

            let allocation = allocate_risk(deposit, base_risk, &config.instruments)?;

            let mut month_profit = Decimal::ZERO;
            let mut trades = 0;
            for (entry, total) in allocation.entries.iter().zip(totals.iter_mut()) {
                if !entry.instrument.active {
                    continue;
                }
                let result = self.model.outcome(entry.instrument, entry.risk_amount);
                month_profit += result.profit();
                trades += result.trades();
                total.total_profit += result.profit();
                total.total_trades += result.trades();
            }

            let fees = config
                .fees
                .estimate(
                    allocation.total_trades(),
                    allocation.average_position_size(),
                    allocation.average_reward_risk(),
                )
                .total();
            let net_profit = month_profit - fees;
            deposit = (deposit + net_profit).max(Decimal::ZERO);
            let drawdown_pct = drawdown.update(deposit);

            debug!(
                month,
                deposit = %deposit,
                profit = %net_profit,
                fees = %fees,
                risk_percent = %allocation.risk_percent,
                "Projected month"
            );

            monthly_data.push(MonthRecord {
                month,
                deposit,
                profit: net_profit,
                risk_percent: allocation.risk_percent,
                risk_amount: allocation.total_risk,
                trades,
                fees,
                drawdown_percent: drawdown_pct,
            });
            milestones.check(month, deposit, allocation.risk_percent);
            last_risk = allocation.risk_percent;
        };

        if outcome == ProjectionOutcome::HorizonExhausted {
            milestones.close_forecast(month, deposit, last_risk);
        }

        let summed: Decimal = totals.iter().map(|t| t.total_profit).sum();
        if summed > Decimal::ZERO {
            for total in &mut totals {
                total.contribution_percent = total.total_profit / summed * Decimal::ONE_HUNDRED;
            }
        }

        let days = days_for_months(month);
        let target_reached = outcome == ProjectionOutcome::TargetReached;

        info!(
            final_deposit = %deposit,
            months = month,
            target_reached,
            max_drawdown = %drawdown.max_pct(),
            "Projection finished"
        );

        Ok(ProjectionResult {
            final_deposit: deposit,
            months_elapsed: month,
            days,
            monthly_data,
            instrument_results: totals,
            milestones: milestones.into_milestones(),
            target_reached,
            outcome,
            target_date: target_reached.then(|| date_after(config.start_date, days)),
            max_drawdown_percent: drawdown.max_pct(),
            max_drawdown_duration_months: drawdown.max_duration(),
        })
    }
}
