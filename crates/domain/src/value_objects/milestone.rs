use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Note attached to the synthetic milestone appended when the horizon runs out.
pub const END_OF_FORECAST_NOTE: &str = "end of forecast";

/// A deposit checkpoint and the month it was first reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub target_amount: Decimal,
    /// 1-based month index of the first crossing.
    pub months_to_reach: u32,
    /// Calendar days from the start, `ceil(months × 30.5)`.
    pub days: u32,
    pub projected_date: NaiveDate,
    pub risk_percent_at_crossing: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Milestone {
    pub fn is_end_of_forecast(&self) -> bool {
        self.note.as_deref() == Some(END_OF_FORECAST_NOTE)
    }
}
