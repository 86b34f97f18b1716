use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One month of a stochastic run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTrace {
    pub month: u32,
    pub deposit: Decimal,
    /// Net profit after fees.
    pub profit: Decimal,
    pub risk_percent: Decimal,
    pub drawdown_percent: Decimal,
}

/// One independent stochastic run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationIteration {
    /// Position of the run in generation order; also its random stream id.
    pub index: usize,
    pub final_deposit: Decimal,
    pub monthly_trace: Vec<MonthTrace>,
    pub roi_percent: Decimal,
    pub cagr_percent: Decimal,
    pub max_drawdown_percent: Decimal,
}

/// Selected runs at fixed ranks of the sorted outcome set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileCuts {
    pub worst: SimulationIteration,
    pub p10: SimulationIteration,
    pub p25: SimulationIteration,
    pub p50: SimulationIteration,
    pub p75: SimulationIteration,
    pub p90: SimulationIteration,
    pub best: SimulationIteration,
}

impl PercentileCuts {
    /// Cuts in ascending rank order with their labels.
    pub fn labeled(&self) -> [(&'static str, &SimulationIteration); 7] {
        [
            ("worst", &self.worst),
            ("p10", &self.p10),
            ("p25", &self.p25),
            ("p50", &self.p50),
            ("p75", &self.p75),
            ("p90", &self.p90),
            ("best", &self.best),
        ]
    }
}

/// Aggregated outcome of a Monte Carlo simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// All runs, ascending by final deposit, ties by index.
    pub iterations: Vec<SimulationIteration>,
    pub percentile_cuts: PercentileCuts,
    pub average_final_deposit: Decimal,
    pub average_max_drawdown: Decimal,
    /// Fraction of runs ending at or above twice the initial deposit.
    pub probability_of_doubling: Decimal,
    /// Fraction of runs ending below the initial deposit.
    pub probability_of_loss: Decimal,
    pub months: u32,
}

impl MonteCarloResult {
    /// Deposit paths of the p10..p90 runs for fan charts.
    pub fn percentile_traces(&self) -> [(&'static str, &[MonthTrace]); 5] {
        let cuts = &self.percentile_cuts;
        [
            ("p10", cuts.p10.monthly_trace.as_slice()),
            ("p25", cuts.p25.monthly_trace.as_slice()),
            ("p50", cuts.p50.monthly_trace.as_slice()),
            ("p75", cuts.p75.monthly_trace.as_slice()),
            ("p90", cuts.p90.monthly_trace.as_slice()),
        ]
    }
}
