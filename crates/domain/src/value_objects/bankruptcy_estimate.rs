use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Heuristic estimate of the odds of a ruinous loss streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankruptcyEstimate {
    /// Ruin probability in percent, within `[0.01, 99.99]`.
    pub probability_percent: Decimal,
    /// Consecutive full-risk losses needed to erode the deposit to $0.10.
    pub critical_loss_streak: u32,
    /// Months until such a streak is expected to occur, if it is expected at all.
    pub expected_months_to_risk: Option<u32>,
    /// EV-weighted win rate in percent over active instruments.
    pub weighted_win_rate: Decimal,
    /// EV-weighted reward:risk over active instruments.
    pub weighted_reward_risk: Decimal,
}
