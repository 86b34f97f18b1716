use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Flat fee and slippage rates used to estimate monthly trading costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee on position entry, as a fraction of notional.
    pub entry_rate: Decimal,
    /// Fee on position exit, as a fraction of notional.
    pub exit_rate: Decimal,
    /// Slippage over total traded volume.
    pub slippage_rate: Decimal,
    /// Share of trades assumed to close as wins, for volume estimation only.
    pub assumed_win_fraction: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            entry_rate: Decimal::new(1, 3),           // 0.1%
            exit_rate: Decimal::new(1, 3),            // 0.1%
            slippage_rate: Decimal::new(2, 3),        // 0.2%
            assumed_win_fraction: Decimal::new(4, 1), // 40%
        }
    }
}

/// Itemized fee estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub entry: Decimal,
    pub win_exit: Decimal,
    pub loss_exit: Decimal,
    pub slippage: Decimal,
}

impl FeeBreakdown {
    pub fn total(&self) -> Decimal {
        self.entry + self.win_exit + self.loss_exit + self.slippage
    }
}

impl FeeSchedule {
    /// Sets the assumed win fraction used for volume estimation.
    #[must_use]
    pub fn with_assumed_win_fraction(mut self, fraction: Decimal) -> Self {
        self.assumed_win_fraction = fraction;
        self
    }

    /// Estimates fees and slippage for a month of trading.
    ///
    /// # Arguments
    ///
    /// * `trades` - Aggregate trade count for the month
    /// * `avg_position_size` - Mean per-trade risk amount across active instruments
    /// * `avg_reward_risk` - Mean reward:risk across active instruments
    pub fn estimate(
        &self,
        trades: u32,
        avg_position_size: Decimal,
        avg_reward_risk: Decimal,
    ) -> FeeBreakdown {
        if trades == 0 {
            return FeeBreakdown::default();
        }

        let trades_dec = Decimal::from(trades);
        let win_trades = (trades_dec * self.assumed_win_fraction)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let loss_trades = trades_dec - win_trades;

        let win_size = avg_position_size * avg_reward_risk;
        let loss_size = avg_position_size;

        let volume = trades_dec * avg_position_size + win_trades * win_size + loss_trades * loss_size;

        FeeBreakdown {
            entry: trades_dec * avg_position_size * self.entry_rate,
            win_exit: win_trades * win_size * self.exit_rate,
            loss_exit: loss_trades * loss_size * self.exit_rate,
            slippage: volume * self.slippage_rate,
        }
    }
}

/// Total fees and slippage under the default schedule.
pub fn estimate_fees(trades: u32, avg_position_size: Decimal, avg_reward_risk: Decimal) -> Decimal {
    FeeSchedule::default()
        .estimate(trades, avg_position_size, avg_reward_risk)
        .total()
}
