//! Derived account metrics: fees, drawdown, loss streaks and ruin risk.

pub mod bankruptcy;
pub mod drawdown;
pub mod fees;
pub mod streaks;

pub use bankruptcy::{critical_loss_streak, estimate_bankruptcy_risk};
pub use drawdown::DrawdownTracker;
pub use fees::{FeeBreakdown, FeeSchedule, estimate_fees};
pub use streaks::{
    InstrumentStreaks, LossStreakProfile, consecutive_loss_probability, instrument_streak_report,
    loss_streak_profile,
};
