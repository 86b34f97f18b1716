//! Heuristic ruin probability.
//!
//! Models ruin as a run of consecutive full-size losses under fixed
//! fractional sizing, then dampens the raw streak probability by how strongly
//! positive the monthly expectancy is. Not a closed-form ruin probability.

use crate::entities::Instrument;
use crate::error::AllocationError;
use crate::math::allocation::split_budget;
use crate::value_objects::BankruptcyEstimate;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Balance at which the account is considered wiped out.
pub const RUIN_BALANCE: f64 = 0.1;
/// Lower clamp of the reported probability, in percent.
pub const MIN_PROBABILITY_PCT: f64 = 0.01;
/// Upper clamp of the reported probability, in percent.
pub const MAX_PROBABILITY_PCT: f64 = 99.99;
/// Deposits below this size get an additional penalty.
pub const SMALL_ACCOUNT_THRESHOLD: f64 = 1000.0;

/// Estimates the probability of a ruinous loss streak.
///
/// # Arguments
///
/// * `deposit` - Current balance
/// * `risk_percent` - Percent of the balance risked per trade sequence
/// * `instruments` - Instrument set; only active ones are considered
///
/// # Errors
///
/// Returns [`AllocationError::DegenerateEv`] when active instruments exist and
/// their EV sum is not positive, since EV weighting is then undefined.
pub fn estimate_bankruptcy_risk(
    deposit: Decimal,
    risk_percent: Decimal,
    instruments: &[Instrument],
) -> Result<BankruptcyEstimate, AllocationError> {
    let total_risk = deposit * risk_percent / Decimal::ONE_HUNDRED;
    let allocation = split_budget(total_risk, instruments)?;
    let active: Vec<_> = allocation.iter().filter(|e| e.instrument.active).collect();

    if active.is_empty() {
        return Ok(BankruptcyEstimate {
            probability_percent: to_decimal(MIN_PROBABILITY_PCT),
            critical_loss_streak: 0,
            expected_months_to_risk: None,
            weighted_win_rate: Decimal::ZERO,
            weighted_reward_risk: Decimal::ZERO,
        });
    }

    let total_ev: Decimal = active.iter().map(|e| e.instrument.ev).sum();
    let weighted_win_rate: Decimal = active
        .iter()
        .map(|e| e.instrument.win_rate * e.instrument.ev / total_ev)
        .sum();
    let weighted_reward_risk: Decimal = active
        .iter()
        .map(|e| e.instrument.reward_risk * e.instrument.ev / total_ev)
        .sum();

    let deposit_f = deposit.to_f64().unwrap_or(0.0);
    let risk_fraction = (risk_percent / Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0);
    let loss_rate = 1.0 - (weighted_win_rate / Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0);

    let Some(critical) = critical_loss_streak(deposit_f, risk_fraction) else {
        // Nothing is risked, so no streak can drain the account.
        return Ok(BankruptcyEstimate {
            probability_percent: to_decimal(MIN_PROBABILITY_PCT),
            critical_loss_streak: 0,
            expected_months_to_risk: None,
            weighted_win_rate,
            weighted_reward_risk,
        });
    };

    let sequence_pct = loss_rate.clamp(0.0, 1.0).powf(f64::from(critical)) * 100.0;

    let monthly_trades: u32 = active.iter().map(|e| e.instrument.monthly_trade_count).sum();
    let windows = f64::from(monthly_trades) - f64::from(critical) + 1.0;
    let expected_sequences = (windows * sequence_pct / 100.0).max(0.0);
    let expected_months_to_risk = if expected_sequences > 0.0 {
        Some((1.0 / expected_sequences).ceil() as u32)
    } else {
        None
    };

    let monthly_ev: f64 = active
        .iter()
        .map(|e| {
            let p = e.instrument.win_probability().to_f64().unwrap_or(0.0);
            let rr = e.instrument.reward_risk.to_f64().unwrap_or(0.0);
            let risk_amount = e.risk_amount.to_f64().unwrap_or(0.0);
            f64::from(e.instrument.monthly_trade_count) * risk_amount * (p * rr - (1.0 - p))
        })
        .sum();

    let ev_adjustment = if monthly_ev > 0.0 && deposit_f > 0.0 {
        1.0 / (1.0 + monthly_ev / deposit_f * 10.0)
    } else {
        1.0
    };

    let mut probability = clamp_probability(sequence_pct * ev_adjustment);
    if deposit_f < SMALL_ACCOUNT_THRESHOLD {
        probability *= 1.0 + (SMALL_ACCOUNT_THRESHOLD - deposit_f) / SMALL_ACCOUNT_THRESHOLD;
        probability = clamp_probability(probability);
    }

    Ok(BankruptcyEstimate {
        probability_percent: to_decimal(probability).round_dp(2),
        critical_loss_streak: critical,
        expected_months_to_risk,
        weighted_win_rate,
        weighted_reward_risk,
    })
}

/// Consecutive full-risk losses that take `deposit` down to [`RUIN_BALANCE`].
///
/// `None` when nothing is risked. At least 1 otherwise.
pub fn critical_loss_streak(deposit: f64, risk_fraction: f64) -> Option<u32> {
    if risk_fraction <= 0.0 {
        return None;
    }
    if risk_fraction >= 1.0 || deposit <= RUIN_BALANCE {
        return Some(1);
    }
    let losses = ((RUIN_BALANCE / deposit).ln() / (1.0 - risk_fraction).ln()).ceil();
    Some((losses as u32).max(1))
}

fn clamp_probability(pct: f64) -> f64 {
    if pct.is_nan() {
        return MIN_PROBABILITY_PCT;
    }
    pct.clamp(MIN_PROBABILITY_PCT, MAX_PROBABILITY_PCT)
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}
