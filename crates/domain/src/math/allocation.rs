use crate::entities::Instrument;
use crate::error::AllocationError;
use crate::math::risk_curve::risk_percent;
use rust_decimal::Decimal;
use serde::Serialize;

/// Risk assigned to one instrument for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationEntry<'a> {
    pub instrument: &'a Instrument,
    /// Share of the month's risk budget in percent. `None` for inactive instruments.
    pub allocation_percent: Option<Decimal>,
    pub risk_amount: Decimal,
}

/// The month's risk budget split across instruments.
///
/// A fresh view computed from the deposit; instruments are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAllocation<'a> {
    pub risk_percent: Decimal,
    pub total_risk: Decimal,
    pub entries: Vec<AllocationEntry<'a>>,
}

impl<'a> RiskAllocation<'a> {
    /// Entries for active instruments, in input order.
    pub fn active(&self) -> impl Iterator<Item = &AllocationEntry<'a>> {
        self.entries.iter().filter(|e| e.instrument.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Aggregate monthly trade count across active instruments.
    pub fn total_trades(&self) -> u32 {
        self.active().map(|e| e.instrument.monthly_trade_count).sum()
    }

    /// Mean per-trade risk amount across active instruments.
    pub fn average_position_size(&self) -> Decimal {
        let count = self.active_count();
        if count == 0 {
            return Decimal::ZERO;
        }
        self.active().map(|e| e.risk_amount).sum::<Decimal>() / Decimal::from(count)
    }

    /// Mean reward:risk across active instruments.
    pub fn average_reward_risk(&self) -> Decimal {
        let count = self.active_count();
        if count == 0 {
            return Decimal::ZERO;
        }
        self.active().map(|e| e.instrument.reward_risk).sum::<Decimal>() / Decimal::from(count)
    }
}

/// Splits the month's risk budget across active instruments proportionally to EV.
///
/// # Arguments
///
/// * `deposit` - Balance the budget is sized on
/// * `base_risk_percent` - Base risk percent fed to the deposit curve
/// * `instruments` - Instrument set, active and inactive
///
/// # Errors
///
/// Returns [`AllocationError::DegenerateEv`] when the active EV sum is not positive.
pub fn allocate_risk(
    deposit: Decimal,
    base_risk_percent: Decimal,
    instruments: &[Instrument],
) -> Result<RiskAllocation<'_>, AllocationError> {
    let risk_percent = risk_percent(deposit, base_risk_percent);
    let total_risk = deposit * risk_percent / Decimal::ONE_HUNDRED;
    let entries = split_budget(total_risk, instruments)?;

    Ok(RiskAllocation {
        risk_percent,
        total_risk,
        entries,
    })
}

/// Splits an explicit risk budget across active instruments proportionally to EV.
///
/// # Errors
///
/// Returns [`AllocationError::DegenerateEv`] when the active EV sum is not positive.
pub fn split_budget(
    total_risk: Decimal,
    instruments: &[Instrument],
) -> Result<Vec<AllocationEntry<'_>>, AllocationError> {
    if !instruments.iter().any(|i| i.active) {
        return Ok(instruments.iter().map(unallocated).collect());
    }

    let total_ev: Decimal = instruments.iter().filter(|i| i.active).map(|i| i.ev).sum();
    if total_ev <= Decimal::ZERO {
        return Err(AllocationError::DegenerateEv { total_ev });
    }

    Ok(instruments
        .iter()
        .map(|instrument| {
            if !instrument.active {
                return unallocated(instrument);
            }
            let allocation_percent = Decimal::ONE_HUNDRED * instrument.ev / total_ev;
            AllocationEntry {
                instrument,
                allocation_percent: Some(allocation_percent),
                risk_amount: total_risk * allocation_percent / Decimal::ONE_HUNDRED,
            }
        })
        .collect())
}

fn unallocated(instrument: &Instrument) -> AllocationEntry<'_> {
    AllocationEntry {
        instrument,
        allocation_percent: None,
        risk_amount: Decimal::ZERO,
    }
}
