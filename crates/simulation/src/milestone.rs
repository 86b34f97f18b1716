//! Deposit checkpoints and their first crossings.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tradeplan_domain::value_objects::{END_OF_FORECAST_NOTE, Milestone};

/// Round-number checkpoints considered for every plan.
pub const STANDARD_MILESTONES: [u32; 10] = [
    1_000, 5_000, 10_000, 25_000, 50_000, 75_000, 100_000, 250_000, 500_000, 1_000_000,
];

/// Fractions of the target added as checkpoints.
const TARGET_FRACTIONS: [(i64, u32); 3] = [(25, 2), (5, 1), (75, 2)];

const LARGE_STEP_START: u32 = 100_000;
/// Round-number steps stop here; larger targets keep only their fractions.
const LARGE_STEP_LIMIT: u32 = 20_000_000;

/// Calendar days for a month count, `ceil(months × 30.5)`.
pub fn days_for_months(months: u32) -> u32 {
    (months * 61).div_ceil(2)
}

/// Calendar date `days` after `start`.
pub fn date_after(start: NaiveDate, days: u32) -> NaiveDate {
    start
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Generates the sorted, deduplicated checkpoint set for a plan.
///
/// # Arguments
///
/// * `start_deposit` - Initial balance; checkpoints must lie above it
/// * `target_deposit` - Plan target; always included
pub fn milestone_targets(start_deposit: Decimal, target_deposit: Decimal) -> Vec<Decimal> {
    let mut targets: Vec<Decimal> = STANDARD_MILESTONES
        .iter()
        .map(|&m| Decimal::from(m))
        .filter(|&m| m > start_deposit && m <= target_deposit)
        .collect();

    for (mantissa, scale) in TARGET_FRACTIONS {
        let value = (target_deposit * Decimal::new(mantissa, scale))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if value > start_deposit {
            targets.push(value);
        }
    }

    let large_start = Decimal::from(LARGE_STEP_START);
    if target_deposit > large_start {
        let step = if target_deposit > Decimal::from(1_000_000) {
            Decimal::from(500_000)
        } else {
            Decimal::from(100_000)
        };
        let last_level = target_deposit.min(Decimal::from(LARGE_STEP_LIMIT) + Decimal::ONE);
        let mut level = large_start;
        while level < last_level {
            if level > start_deposit {
                targets.push(level);
            }
            level += step;
        }
    }

    targets.push(target_deposit);
    targets.sort();
    targets.dedup();
    targets
}

/// Records the first month each checkpoint is met.
#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    targets: Vec<Decimal>,
    next: usize,
    start_date: NaiveDate,
    reached: Vec<Milestone>,
}

impl MilestoneTracker {
    pub fn new(start_deposit: Decimal, target_deposit: Decimal, start_date: NaiveDate) -> Self {
        Self {
            targets: milestone_targets(start_deposit, target_deposit),
            next: 0,
            start_date,
            reached: Vec::new(),
        }
    }

    pub fn targets(&self) -> &[Decimal] {
        &self.targets
    }

    /// Records every pending checkpoint at or below `deposit`.
    ///
    /// Targets are sorted and unrecorded ones all lie above the running
    /// maximum, so a cursor is enough.
    pub fn check(&mut self, month: u32, deposit: Decimal, risk_percent: Decimal) -> usize {
        let before = self.reached.len();
        while let Some(&target) = self.targets.get(self.next) {
            if target > deposit {
                break;
            }
            self.reached.push(self.milestone(target, month, risk_percent, None));
            self.next += 1;
        }
        self.reached.len() - before
    }

    /// Appends the synthetic checkpoint marking an exhausted horizon.
    ///
    /// The amount is truncated to cents so it never exceeds the final deposit.
    pub fn close_forecast(&mut self, month: u32, deposit: Decimal, risk_percent: Decimal) {
        let milestone = self.milestone(
            deposit.round_dp_with_strategy(2, RoundingStrategy::ToZero),
            month,
            risk_percent,
            Some(END_OF_FORECAST_NOTE.to_string()),
        );
        self.reached.push(milestone);
    }

    pub fn into_milestones(self) -> Vec<Milestone> {
        self.reached
    }

    fn milestone(
        &self,
        target_amount: Decimal,
        month: u32,
        risk_percent: Decimal,
        note: Option<String>,
    ) -> Milestone {
        let days = days_for_months(month);
        Milestone {
            target_amount,
            months_to_reach: month,
            days,
            projected_date: date_after(self.start_date, days),
            risk_percent_at_crossing: risk_percent,
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_days_for_months() {
        assert_eq!(days_for_months(0), 0);
        assert_eq!(days_for_months(1), 31);
        assert_eq!(days_for_months(2), 61);
        assert_eq!(days_for_months(24), 732);
    }

    #[test]
    fn test_small_target() {
        // 250, 500 and 750 are not above 400
        assert_eq!(milestone_targets(dec!(400), dec!(1000)), vec![dec!(1000)]);
    }

    #[test]
    fn test_default_plan_targets() {
        let targets = milestone_targets(dec!(400), dec!(100000));
        assert_eq!(
            targets,
            vec![
                dec!(1000),
                dec!(5000),
                dec!(10000),
                dec!(25000),
                dec!(50000),
                dec!(75000),
                dec!(100000)
            ]
        );
    }

    #[test]
    fn test_large_target_steps() {
        let targets = milestone_targets(dec!(10000), dec!(2000000));
        assert!(!targets.contains(&dec!(10000)));
        assert_eq!(targets.first(), Some(&dec!(25000)));
        for level in [dec!(100000), dec!(600000), dec!(1100000), dec!(1600000)] {
            assert!(targets.contains(&level), "missing {level}");
        }
        assert!(targets.contains(&dec!(1500000)));
        assert_eq!(targets.last(), Some(&dec!(2000000)));
        assert!(targets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_huge_target_is_bounded() {
        let target = dec!(10000000000000);
        let targets = milestone_targets(dec!(400), target);
        assert!(targets.len() < 60, "{} targets", targets.len());
        // 100k + 39 * 500k is the last round-number step
        assert!(targets.contains(&dec!(19600000)));
        assert!(!targets.contains(&dec!(20100000)));
        assert!(targets.contains(&dec!(2500000000000)));
        assert_eq!(targets.last(), Some(&target));

        let near_max = milestone_targets(dec!(400), Decimal::MAX / dec!(2));
        assert!(near_max.len() < 60);
        assert!(near_max.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_percentage_targets_round_half_up() {
        let targets = milestone_targets(dec!(100), dec!(1001));
        // 250.25 -> 250, 500.5 -> 501, 750.75 -> 751
        assert_eq!(targets, vec![dec!(250), dec!(501), dec!(751), dec!(1000), dec!(1001)]);
    }

    #[test]
    fn test_first_crossing_only() {
        let mut tracker = MilestoneTracker::new(dec!(400), dec!(100000), start());
        assert_eq!(tracker.targets().len(), 7);
        assert_eq!(tracker.check(1, dec!(999), dec!(10)), 0);
        assert_eq!(tracker.check(2, dec!(5200), dec!(7)), 2);
        assert_eq!(tracker.targets()[tracker.reached.len()], dec!(10000));
        assert_eq!(tracker.check(3, dec!(4800), dec!(6)), 0);
        assert_eq!(tracker.check(4, dec!(5300), dec!(6)), 0);

        let milestones = tracker.into_milestones();
        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[0].target_amount, dec!(1000));
        assert_eq!(milestones[0].months_to_reach, 2);
        assert_eq!(milestones[0].days, 61);
        assert_eq!(
            milestones[0].projected_date,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        assert_eq!(milestones[1].target_amount, dec!(5000));
        assert_eq!(milestones[1].risk_percent_at_crossing, dec!(7));
    }

    #[test]
    fn test_close_forecast() {
        let mut tracker = MilestoneTracker::new(dec!(400), dec!(100000), start());
        tracker.close_forecast(24, dec!(812.3456), dec!(10));
        tracker.close_forecast(24, dec!(1855.2498655), dec!(10));
        let milestones = tracker.into_milestones();
        assert!(milestones[0].is_end_of_forecast());
        assert_eq!(milestones[0].target_amount, dec!(812.34));
        assert_eq!(milestones[1].target_amount, dec!(1855.24));
        assert_eq!(milestones[0].days, 732);
    }
}
