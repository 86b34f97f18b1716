use crate::enums::ProjectionOutcome;
use crate::value_objects::milestone::Milestone;
use crate::value_objects::month_record::MonthRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Accumulated contribution of one instrument over a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentPerformance {
    pub symbol: String,
    pub total_profit: Decimal,
    pub total_trades: u32,
    /// Share of the summed instrument profit, in percent. Zero when that sum is not positive.
    pub contribution_percent: Decimal,
}

/// Average monthly growth under each scenario band, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthBands {
    pub pessimistic: Decimal,
    pub realistic: Decimal,
    pub optimistic: Decimal,
}

/// Output of a deterministic projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub final_deposit: Decimal,
    pub months_elapsed: u32,
    /// `ceil(months_elapsed × 30.5)`.
    pub days: u32,
    pub monthly_data: Vec<MonthRecord>,
    pub instrument_results: Vec<InstrumentPerformance>,
    pub milestones: Vec<Milestone>,
    pub target_reached: bool,
    pub outcome: ProjectionOutcome,
    /// Date the target is reached, when it is.
    pub target_date: Option<NaiveDate>,
    pub max_drawdown_percent: Decimal,
    pub max_drawdown_duration_months: u32,
}

impl ProjectionResult {
    pub fn initial_deposit(&self) -> Decimal {
        self.monthly_data
            .first()
            .map(|m| m.deposit)
            .unwrap_or(Decimal::ZERO)
    }

    /// Compound average monthly growth in percent: `(final / initial)^(1 / months) − 1`.
    pub fn average_monthly_growth_pct(&self) -> Decimal {
        let initial = self.initial_deposit();
        if self.months_elapsed == 0 || initial <= Decimal::ZERO || self.final_deposit <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let ratio = (self.final_deposit / initial).to_f64().unwrap_or(1.0);
        let growth = (ratio.powf(1.0 / f64::from(self.months_elapsed)) - 1.0) * 100.0;
        Decimal::from_f64(growth).unwrap_or(Decimal::ZERO)
    }

    /// Average monthly growth scaled by ×0.8 / ×1.0 / ×1.2.
    pub fn growth_bands(&self) -> GrowthBands {
        let realistic = self.average_monthly_growth_pct();
        GrowthBands {
            pessimistic: realistic * Decimal::new(8, 1),
            realistic,
            optimistic: realistic * Decimal::new(12, 1),
        }
    }

    /// Largest monthly risk amount over the projection.
    pub fn max_risk_amount(&self) -> Decimal {
        self.monthly_data
            .iter()
            .map(|m| m.risk_amount)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Milestones excluding the synthetic end-of-forecast entry.
    pub fn reached_milestones(&self) -> impl Iterator<Item = &Milestone> {
        self.milestones.iter().filter(|m| !m.is_end_of_forecast())
    }
}
