//! Loss-streak statistics for individual instruments.

use crate::entities::Instrument;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Upper bound on the reported expected streak length.
pub const MAX_EXPECTED_STREAK: u32 = 10;

/// Typical loss-streak lengths for a win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossStreakProfile {
    /// Mean trades until the first win, `round(1 / p)`, capped at [`MAX_EXPECTED_STREAK`].
    pub expected: u32,
    /// Longest streak that still has at least even odds of occurring, minimum 1.
    pub most_probable: u32,
}

/// Streak statistics for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentStreaks {
    pub symbol: String,
    /// Probability of three losses in a row, in percent.
    pub three_in_a_row_pct: Decimal,
    pub profile: LossStreakProfile,
}

/// Probability in percent of `count` consecutive losses.
///
/// # Arguments
///
/// * `win_rate` - Win probability in percent
/// * `count` - Streak length
pub fn consecutive_loss_probability(win_rate: Decimal, count: u32) -> Decimal {
    let loss_rate = (Decimal::ONE_HUNDRED - win_rate) / Decimal::ONE_HUNDRED;
    let loss_rate = loss_rate.to_f64().unwrap_or(0.0);
    let pct = loss_rate.powi(count as i32) * 100.0;
    Decimal::from_f64(pct).unwrap_or(Decimal::ZERO)
}

/// Expected and most probable loss-streak lengths for a win rate in percent.
pub fn loss_streak_profile(win_rate: Decimal) -> LossStreakProfile {
    let p = (win_rate / Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0);
    let loss_rate = 1.0 - p;

    let expected = if p > 0.0 {
        ((1.0 / p).round() as u32).min(MAX_EXPECTED_STREAK)
    } else {
        MAX_EXPECTED_STREAK
    };

    let most_probable = if loss_rate > 0.0 && loss_rate < 1.0 {
        (0.5_f64.ln() / loss_rate.ln()).floor() as u32
    } else {
        0
    };

    LossStreakProfile {
        expected,
        most_probable: most_probable.max(1),
    }
}

/// Streak report for every active instrument, in input order.
pub fn instrument_streak_report(instruments: &[Instrument]) -> Vec<InstrumentStreaks> {
    instruments
        .iter()
        .filter(|i| i.active)
        .map(|i| InstrumentStreaks {
            symbol: i.symbol.clone(),
            three_in_a_row_pct: consecutive_loss_probability(i.win_rate, 3),
            profile: loss_streak_profile(i.win_rate),
        })
        .collect()
}
