//! Stochastic multi-iteration replay of the monthly trading process.
//!
//! Every iteration owns a ChaCha stream selected by its index under a single
//! run seed, so results are identical whether iterations run sequentially or
//! on the rayon pool.

use crate::control::CancellationToken;
use crate::error::SimulationError;
use crate::outcome::{SampledOutcome, TradeOutcomeModel};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tracing::{debug, info, warn};
use tradeplan_domain::config::Config;
use tradeplan_domain::error::ValidationError;
use tradeplan_domain::math::allocate_risk;
use tradeplan_domain::metrics::DrawdownTracker;
use tradeplan_domain::value_objects::{
    MonteCarloResult, MonthTrace, PercentileCuts, SimulationIteration,
};

/// Balances are capped at this multiple of the initial deposit.
pub const GROWTH_CAP_MULTIPLE: u32 = 100;

/// Shape of a Monte Carlo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloConfig {
    /// Months simulated per iteration.
    pub months: u32,
    pub iterations: usize,
    /// Run seed; iteration `i` uses stream `i` of this seed.
    pub seed: u64,
    /// Distribute iterations across the rayon pool.
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            months: 24,
            iterations: 1000,
            seed: 42,
            parallel: true,
        }
    }
}

impl MonteCarloConfig {
    #[must_use]
    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Runs a Monte Carlo simulation to completion.
///
/// # Errors
///
/// Returns a validation error for a malformed config, a zero horizon or zero
/// iterations, and an allocation error when the active EV sum is not positive.
pub fn run_monte_carlo(
    config: &Config,
    settings: &MonteCarloConfig,
) -> Result<MonteCarloResult, SimulationError> {
    run_monte_carlo_with_cancel(config, settings, &CancellationToken::new())
}

/// Runs a Monte Carlo simulation that aborts when `cancel` fires.
///
/// # Errors
///
/// As [`run_monte_carlo`], plus [`SimulationError::Cancelled`]. Partial
/// results are discarded.
pub fn run_monte_carlo_with_cancel(
    config: &Config,
    settings: &MonteCarloConfig,
    cancel: &CancellationToken,
) -> Result<MonteCarloResult, SimulationError> {
    config.validate()?;
    config.validate_allocation()?;
    if settings.months == 0 {
        return Err(ValidationError::ZeroHorizon.into());
    }
    if settings.iterations == 0 {
        return Err(ValidationError::ZeroIterations.into());
    }

    info!(
        iterations = settings.iterations,
        months = settings.months,
        seed = settings.seed,
        parallel = settings.parallel,
        "Starting Monte Carlo simulation"
    );

    let run = |index: usize| simulate_iteration(config, settings, index, cancel);
    let outcome: Result<Vec<SimulationIteration>, SimulationError> = if settings.parallel {
        (0..settings.iterations).into_par_iter().map(run).collect()
    } else {
        (0..settings.iterations).map(run).collect()
    };

    let iterations = match outcome {
        Ok(iterations) => iterations,
        Err(err) => {
            if err == SimulationError::Cancelled {
                warn!("Monte Carlo simulation cancelled");
            }
            return Err(err);
        }
    };

    let result = aggregate(iterations, config.initial_deposit, settings.months);
    info!(
        median = %result.percentile_cuts.p50.final_deposit,
        average = %result.average_final_deposit,
        probability_of_doubling = %result.probability_of_doubling,
        "Monte Carlo simulation finished"
    );
    Ok(result)
}

/// Plays one iteration on its own random stream.
fn simulate_iteration(
    config: &Config,
    settings: &MonteCarloConfig,
    index: usize,
    cancel: &CancellationToken,
) -> Result<SimulationIteration, SimulationError> {
    if cancel.is_cancelled() {
        return Err(SimulationError::Cancelled);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    rng.set_stream(index as u64);
    let mut model = SampledOutcome::new(rng);

    let initial = config.initial_deposit;
    let cap = initial * Decimal::from(GROWTH_CAP_MULTIPLE);
    let mut deposit = initial;
    let mut drawdown = DrawdownTracker::new(initial);
    let mut monthly_trace = Vec::with_capacity(settings.months as usize);

    for month in 1..=settings.months {
        let allocation = allocate_risk(deposit, config.base_risk_percent, &config.instruments)?;

        let month_profit: Decimal = allocation
            .active()
            .map(|entry| model.outcome(entry.instrument, entry.risk_amount).profit())
            .sum();
        let fees = config
            .fees
            .estimate(
                allocation.total_trades(),
                allocation.average_position_size(),
                allocation.average_reward_risk(),
            )
            .total();
        let net_profit = month_profit - fees;

        deposit = (deposit + net_profit + config.monthly_contribution)
            .min(cap)
            .max(Decimal::ZERO);
        let drawdown_pct = drawdown.update(deposit);

        monthly_trace.push(MonthTrace {
            month,
            deposit,
            profit: net_profit,
            risk_percent: allocation.risk_percent,
            drawdown_percent: drawdown_pct,
        });
    }

    let ratio = deposit / initial;
    let roi_percent = (ratio - Decimal::ONE) * Decimal::ONE_HUNDRED;
    let years = f64::from(settings.months) / 12.0;
    let cagr = (ratio.to_f64().unwrap_or(0.0).powf(1.0 / years) - 1.0) * 100.0;

    debug!(index, final_deposit = %deposit, "Iteration finished");

    Ok(SimulationIteration {
        index,
        final_deposit: deposit,
        monthly_trace,
        roi_percent,
        cagr_percent: Decimal::from_f64(cagr).unwrap_or(Decimal::ZERO),
        max_drawdown_percent: drawdown.max_pct(),
    })
}

/// Sorts iterations and extracts percentile cuts and summary statistics.
///
/// `iterations` must not be empty.
fn aggregate(
    mut iterations: Vec<SimulationIteration>,
    initial_deposit: Decimal,
    months: u32,
) -> MonteCarloResult {
    iterations.sort_by(|a, b| {
        a.final_deposit
            .cmp(&b.final_deposit)
            .then(a.index.cmp(&b.index))
    });

    let n = iterations.len();
    let count = Decimal::from(n);
    let at = |p: f64| iterations[((n as f64 * p).floor() as usize).min(n - 1)].clone();

    let percentile_cuts = PercentileCuts {
        worst: iterations[0].clone(),
        p10: at(0.1),
        p25: at(0.25),
        p50: at(0.5),
        p75: at(0.75),
        p90: at(0.9),
        best: iterations[n - 1].clone(),
    };

    let average_final_deposit =
        iterations.iter().map(|i| i.final_deposit).sum::<Decimal>() / count;
    let average_max_drawdown =
        iterations.iter().map(|i| i.max_drawdown_percent).sum::<Decimal>() / count;

    let doubled = iterations
        .iter()
        .filter(|i| i.final_deposit >= initial_deposit * Decimal::TWO)
        .count();
    let lost = iterations
        .iter()
        .filter(|i| i.final_deposit < initial_deposit)
        .count();

    MonteCarloResult {
        percentile_cuts,
        average_final_deposit,
        average_max_drawdown,
        probability_of_doubling: Decimal::from(doubled) / count,
        probability_of_loss: Decimal::from(lost) / count,
        months,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradeplan_domain::entities::Instrument;

    fn reference_config() -> Config {
        Config::new(dec!(400), dec!(1000), dec!(10))
            .with_instrument(Instrument::new("A", dec!(0.5), dec!(50), dec!(2), 10))
    }

    fn small_run() -> MonteCarloConfig {
        MonteCarloConfig::default()
            .with_months(6)
            .with_iterations(50)
            .with_seed(7)
    }

    #[test]
    fn test_sorted_and_ordered_cuts() {
        let result = run_monte_carlo(&reference_config(), &small_run()).unwrap();
        assert_eq!(result.iterations.len(), 50);
        assert!(
            result
                .iterations
                .windows(2)
                .all(|w| w[0].final_deposit <= w[1].final_deposit)
        );

        let cuts: Vec<Decimal> = result
            .percentile_cuts
            .labeled()
            .iter()
            .map(|(_, it)| it.final_deposit)
            .collect();
        assert!(cuts.windows(2).all(|w| w[0] <= w[1]));
        // floor(50 * 0.1) = 5
        assert_eq!(result.percentile_cuts.p10, result.iterations[5]);
        assert_eq!(result.percentile_cuts.p50, result.iterations[25]);
        assert_eq!(result.percentile_cuts.best, result.iterations[49]);
    }

    #[test]
    fn test_traces_cover_horizon() {
        let result = run_monte_carlo(&reference_config(), &small_run()).unwrap();
        let cap = dec!(400) * Decimal::from(GROWTH_CAP_MULTIPLE);
        for iteration in &result.iterations {
            assert_eq!(iteration.monthly_trace.len(), 6);
            assert_eq!(iteration.monthly_trace.last().unwrap().deposit, iteration.final_deposit);
            assert!(iteration.final_deposit <= cap);
            assert!(iteration.final_deposit >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = reference_config();
        let a = run_monte_carlo(&config, &small_run()).unwrap();
        let b = run_monte_carlo(&config, &small_run()).unwrap();
        assert_eq!(a, b);

        let sequential = run_monte_carlo(&config, &small_run().with_parallel(false)).unwrap();
        assert_eq!(a, sequential);
    }

    #[test]
    fn test_different_seed_differs() {
        let config = reference_config();
        let a = run_monte_carlo(&config, &small_run()).unwrap();
        let b = run_monte_carlo(&config, &small_run().with_seed(8)).unwrap();
        assert_ne!(a.iterations, b.iterations);
    }

    #[test]
    fn test_trace_matches_manual_replay() {
        use rand::Rng;
        use tradeplan_domain::math::risk_percent;
        use tradeplan_domain::metrics::FeeSchedule;

        let config = Config::new(dec!(1000), dec!(1000000), dec!(10))
            .with_instrument(Instrument::new("A", dec!(0.2), dec!(40), dec!(2), 5))
            .with_monthly_contribution(dec!(50));
        let settings = small_run().with_months(24);
        let iteration =
            simulate_iteration(&config, &settings, 3, &CancellationToken::new()).unwrap();
        assert_eq!(iteration.monthly_trace.len(), 24);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        rng.set_stream(3);
        let schedule = FeeSchedule::default();
        let cap = dec!(100000);
        let mut deposit = dec!(1000);
        let mut peak = deposit;
        let mut max_drawdown = Decimal::ZERO;

        for (month, trace) in (1..).zip(&iteration.monthly_trace) {
            let risk_pct = risk_percent(deposit, dec!(10));
            let allocation = allocate_risk(deposit, dec!(10), &config.instruments).unwrap();
            // a single instrument takes the whole budget
            assert_eq!(allocation.entries[0].allocation_percent, Some(dec!(100)));
            let risk = allocation.entries[0].risk_amount;
            let wins = (0..5).filter(|_| rng.random::<f64>() < 0.4).count() as u32;
            let pnl = Decimal::from(wins) * risk * dec!(2) - Decimal::from(5 - wins) * risk;
            let fees = schedule.estimate(5, risk, dec!(2)).total();
            let net = pnl - fees;
            // contribution lands with the month's P&L
            deposit = (deposit + net + dec!(50)).min(cap).max(Decimal::ZERO);

            let drawdown = if deposit > peak {
                peak = deposit;
                Decimal::ZERO
            } else {
                (peak - deposit) / peak * Decimal::ONE_HUNDRED
            };
            max_drawdown = max_drawdown.max(drawdown);

            assert_eq!(trace.month, month);
            assert_eq!(trace.risk_percent, risk_pct);
            assert_eq!(trace.profit, net);
            assert_eq!(trace.deposit, deposit);
            assert_eq!(trace.drawdown_percent, drawdown);
        }

        assert_eq!(iteration.final_deposit, deposit);
        assert_eq!(iteration.max_drawdown_percent, max_drawdown);
        assert!(max_drawdown > Decimal::ZERO);
        assert_eq!(iteration.roi_percent, (deposit / dec!(1000) - Decimal::ONE) * Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_growth_is_capped() {
        let config = Config::new(dec!(100), dec!(1000), dec!(50))
            .with_instrument(Instrument::new("A", dec!(3), dec!(90), dec!(5), 40));
        let settings = small_run().with_months(12).with_iterations(5);
        let result = run_monte_carlo(&config, &settings).unwrap();
        assert!(result.iterations.iter().all(|i| i.final_deposit == dec!(10000)));
        assert_eq!(result.probability_of_doubling, Decimal::ONE);
        assert_eq!(result.probability_of_loss, Decimal::ZERO);
    }

    #[test]
    fn test_no_active_instruments_only_contributions() {
        let config = Config::new(dec!(400), dec!(1000), dec!(10))
            .with_instrument(Instrument::new("A", dec!(0.5), dec!(50), dec!(2), 10).inactive())
            .with_monthly_contribution(dec!(25));
        let settings = small_run().with_months(4).with_iterations(3);
        let result = run_monte_carlo(&config, &settings).unwrap();
        for iteration in &result.iterations {
            assert_eq!(iteration.final_deposit, dec!(500));
            assert_eq!(iteration.roi_percent, dec!(25));
            assert_eq!(iteration.max_drawdown_percent, Decimal::ZERO);
        }
        assert_eq!(result.average_final_deposit, dec!(500));
    }

    #[test]
    fn test_rejects_empty_runs() {
        let config = reference_config();
        assert_eq!(
            run_monte_carlo(&config, &small_run().with_iterations(0)),
            Err(SimulationError::Validation(ValidationError::ZeroIterations))
        );
        assert_eq!(
            run_monte_carlo(&config, &small_run().with_months(0)),
            Err(SimulationError::Validation(ValidationError::ZeroHorizon))
        );
    }

    #[test]
    fn test_pre_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            run_monte_carlo_with_cancel(&reference_config(), &small_run(), &token),
            Err(SimulationError::Cancelled)
        );
    }
}
