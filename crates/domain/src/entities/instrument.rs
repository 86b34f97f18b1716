use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A traded instrument and its edge parameters.
///
/// Allocation figures are not stored here; they are produced fresh by
/// [`crate::math::allocation::allocate_risk`] for a given deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub active: bool,
    /// Expected value per trade in risk units. Weight for risk allocation.
    pub ev: Decimal,
    /// Win probability in percent, `(0, 100)`.
    pub win_rate: Decimal,
    /// Reward-to-risk multiple of a winning trade.
    pub reward_risk: Decimal,
    pub monthly_trade_count: u32,
    /// Display color. Carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Instrument {
    /// Creates an active instrument.
    pub fn new(
        symbol: impl Into<String>,
        ev: Decimal,
        win_rate: Decimal,
        reward_risk: Decimal,
        monthly_trade_count: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            active: true,
            ev,
            win_rate,
            reward_risk,
            monthly_trade_count,
            color: None,
        }
    }

    /// Creates an active instrument whose EV is derived from its win rate and
    /// reward:risk when `ev` is zero.
    pub fn with_derived_ev(
        symbol: impl Into<String>,
        ev: Decimal,
        win_rate: Decimal,
        reward_risk: Decimal,
        monthly_trade_count: u32,
    ) -> Self {
        let ev = if ev.is_zero() {
            expected_value(win_rate, reward_risk).round_dp(3)
        } else {
            ev
        };
        Self::new(symbol, ev, win_rate, reward_risk, monthly_trade_count)
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Win probability as a fraction in `[0, 1]`.
    pub fn win_probability(&self) -> Decimal {
        self.win_rate / Decimal::ONE_HUNDRED
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidInstrument {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        };

        if self.win_rate <= Decimal::ZERO || self.win_rate >= Decimal::ONE_HUNDRED {
            return Err(invalid("win rate must be within (0, 100)"));
        }
        if self.reward_risk <= Decimal::ZERO {
            return Err(invalid("reward:risk must be positive"));
        }
        if self.monthly_trade_count == 0 {
            return Err(invalid("monthly trade count must be positive"));
        }
        Ok(())
    }
}

/// Per-trade expected value in risk units: `p × rr − (1 − p)`.
pub fn expected_value(win_rate: Decimal, reward_risk: Decimal) -> Decimal {
    let p = win_rate / Decimal::ONE_HUNDRED;
    p * reward_risk - (Decimal::ONE - p)
}
