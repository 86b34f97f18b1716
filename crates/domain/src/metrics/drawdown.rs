use rust_decimal::Decimal;

/// Running peak and drawdown bookkeeping for a deposit series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawdownTracker {
    peak: Decimal,
    current_pct: Decimal,
    max_pct: Decimal,
    current_duration: u32,
    max_duration: u32,
}

impl DrawdownTracker {
    /// Starts tracking with `initial` as the first peak.
    pub fn new(initial: Decimal) -> Self {
        Self {
            peak: initial,
            current_pct: Decimal::ZERO,
            max_pct: Decimal::ZERO,
            current_duration: 0,
            max_duration: 0,
        }
    }

    /// Feeds the next balance and returns the current drawdown in percent.
    ///
    /// A balance above the peak resets the drawdown and its duration. A
    /// balance equal to the peak keeps the duration unchanged.
    pub fn update(&mut self, deposit: Decimal) -> Decimal {
        if deposit > self.peak {
            self.peak = deposit;
            self.current_pct = Decimal::ZERO;
            self.current_duration = 0;
            return self.current_pct;
        }

        self.current_pct = if self.peak > Decimal::ZERO {
            (self.peak - deposit) / self.peak * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        if self.current_pct > Decimal::ZERO {
            self.current_duration += 1;
            self.max_pct = self.max_pct.max(self.current_pct);
            self.max_duration = self.max_duration.max(self.current_duration);
        }
        self.current_pct
    }

    pub fn peak(&self) -> Decimal {
        self.peak
    }

    pub fn current_pct(&self) -> Decimal {
        self.current_pct
    }

    pub fn max_pct(&self) -> Decimal {
        self.max_pct
    }

    /// Longest run of consecutive months spent below the peak.
    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_peak_resets() {
        let mut tracker = DrawdownTracker::new(dec!(100));
        assert_eq!(tracker.update(dec!(90)), dec!(10));
        assert_eq!(tracker.update(dec!(120)), Decimal::ZERO);
        assert_eq!(tracker.peak(), dec!(120));
        assert_eq!(tracker.max_pct(), dec!(10));
        assert_eq!(tracker.max_duration(), 1);
    }

    #[test]
    fn test_duration_counts_consecutive_months() {
        let mut tracker = DrawdownTracker::new(dec!(1000));
        tracker.update(dec!(950));
        tracker.update(dec!(900));
        tracker.update(dec!(980));
        tracker.update(dec!(1100));
        tracker.update(dec!(1000));

        assert_eq!(tracker.max_duration(), 3);
        assert_eq!(tracker.max_pct(), dec!(10));
        // (1100 - 1000) / 1100 * 100
        assert_eq!(tracker.current_pct(), dec!(100) / dec!(1100) * dec!(100));
    }

    #[test]
    fn test_flat_series_has_no_drawdown() {
        let mut tracker = DrawdownTracker::new(dec!(500));
        for _ in 0..5 {
            assert_eq!(tracker.update(dec!(500)), Decimal::ZERO);
        }
        assert_eq!(tracker.max_duration(), 0);
    }
}
