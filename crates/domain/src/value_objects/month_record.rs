use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a deterministic projection.
///
/// Month 0 is the seed row: the initial deposit with the risk sizing that
/// applies to it and every flow field at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: u32,
    /// Balance at the end of the month.
    pub deposit: Decimal,
    /// Net profit after fees.
    pub profit: Decimal,
    /// Risk percent in effect during the month.
    pub risk_percent: Decimal,
    /// Total amount at risk during the month.
    pub risk_amount: Decimal,
    pub trades: u32,
    pub fees: Decimal,
    pub drawdown_percent: Decimal,
}

impl MonthRecord {
    /// Seed row for month 0.
    pub fn seed(deposit: Decimal, risk_percent: Decimal, risk_amount: Decimal) -> Self {
        Self {
            month: 0,
            deposit,
            profit: Decimal::ZERO,
            risk_percent,
            risk_amount,
            trades: 0,
            fees: Decimal::ZERO,
            drawdown_percent: Decimal::ZERO,
        }
    }

    /// Growth over the previous balance in percent.
    pub fn growth_pct(&self, previous_deposit: Decimal) -> Option<Decimal> {
        if previous_deposit.is_zero() {
            return None;
        }
        Some((self.deposit / previous_deposit - Decimal::ONE) * Decimal::ONE_HUNDRED)
    }
}
