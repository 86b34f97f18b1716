use rust_decimal::Decimal;

/// One step of the deposit risk curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskBracket {
    /// Exclusive upper bound of the deposit for this bracket. `None` for the last.
    pub below: Option<Decimal>,
    /// Multiplier applied to the base risk percent.
    pub multiplier: Decimal,
    /// Absolute ceiling on the resulting percent. `None` means uncapped.
    pub ceiling: Option<Decimal>,
}

const fn d(mantissa: u32, scale: u32) -> Decimal {
    Decimal::from_parts(mantissa, 0, 0, false, scale)
}

const fn bracket(below: u32, multiplier: Decimal, ceiling: Option<Decimal>) -> RiskBracket {
    RiskBracket {
        below: Some(d(below, 0)),
        multiplier,
        ceiling,
    }
}

/// Brackets in ascending deposit order. Both multipliers and ceilings are
/// non-increasing, which keeps the curve non-increasing in the deposit.
pub const RISK_BRACKETS: [RiskBracket; 9] = [
    bracket(1_000, d(10, 1), None),
    bracket(2_000, d(9, 1), Some(d(80, 1))),
    bracket(3_000, d(8, 1), Some(d(70, 1))),
    bracket(5_000, d(7, 1), Some(d(60, 1))),
    bracket(10_000, d(6, 1), Some(d(50, 1))),
    bracket(20_000, d(5, 1), Some(d(40, 1))),
    bracket(50_000, d(4, 1), Some(d(35, 1))),
    bracket(75_000, d(35, 2), Some(d(30, 1))),
    RiskBracket {
        below: None,
        multiplier: d(3, 1),
        ceiling: Some(d(25, 1)),
    },
];

/// Returns the bracket that applies to `deposit`.
pub fn bracket_for(deposit: Decimal) -> &'static RiskBracket {
    let [bounded @ .., open] = &RISK_BRACKETS;
    bounded
        .iter()
        .find(|b| b.below.is_some_and(|limit| deposit < limit))
        .unwrap_or(open)
}

/// Effective monthly risk percent for a deposit size.
///
/// # Arguments
///
/// * `deposit` - Current account balance
/// * `base_risk_percent` - User-selected risk percent for small accounts
///
/// # Returns
///
/// * `Decimal` - Risk percent, never above `base_risk_percent`
pub fn risk_percent(deposit: Decimal, base_risk_percent: Decimal) -> Decimal {
    let bracket = bracket_for(deposit);
    let scaled = base_risk_percent * bracket.multiplier;
    match bracket.ceiling {
        Some(ceiling) => scaled.min(ceiling),
        None => scaled,
    }
}

/// Total amount put at risk for the month: `deposit × risk% / 100`.
pub fn risk_amount(deposit: Decimal, base_risk_percent: Decimal) -> Decimal {
    deposit * risk_percent(deposit, base_risk_percent) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bracket_constants() {
        assert_eq!(RISK_BRACKETS[0].below, Some(dec!(1000)));
        assert_eq!(RISK_BRACKETS[0].multiplier, dec!(1.0));
        assert_eq!(RISK_BRACKETS[7].multiplier, dec!(0.35));
        assert_eq!(RISK_BRACKETS[8].ceiling, Some(dec!(2.5)));
    }

    #[test]
    fn test_bracket_lookup_edges() {
        assert_eq!(bracket_for(dec!(0)), &RISK_BRACKETS[0]);
        assert_eq!(bracket_for(dec!(999.99)), &RISK_BRACKETS[0]);
        assert_eq!(bracket_for(dec!(1000)), &RISK_BRACKETS[1]);
        assert_eq!(bracket_for(dec!(74999)), &RISK_BRACKETS[7]);
        assert_eq!(bracket_for(dec!(75000)), &RISK_BRACKETS[8]);
        assert_eq!(bracket_for(Decimal::MAX), &RISK_BRACKETS[8]);
    }

    #[test]
    fn test_small_deposit_uses_base() {
        assert_eq!(risk_percent(dec!(400), dec!(10)), dec!(10));
        assert_eq!(risk_percent(dec!(999.99), dec!(10)), dec!(10));
    }

    #[test]
    fn test_brackets_with_ceilings() {
        // 10 * 0.9 = 9 capped at 8
        assert_eq!(risk_percent(dec!(1000), dec!(10)), dec!(8.0));
        // 10 * 0.8 = 8 capped at 7
        assert_eq!(risk_percent(dec!(2500), dec!(10)), dec!(7.0));
        // 10 * 0.6 = 6 capped at 5
        assert_eq!(risk_percent(dec!(9999), dec!(10)), dec!(5.0));
        // 5 * 0.3 = 1.5, under the 2.5 ceiling
        assert_eq!(risk_percent(dec!(1000000), dec!(5)), dec!(1.5));
        // 2 * 0.5 = 1.0
        assert_eq!(risk_percent(dec!(15000), dec!(2)), dec!(1.0));
    }

    #[test]
    fn test_non_increasing_and_bounded_by_base() {
        let deposits = [
            dec!(1),
            dec!(999),
            dec!(1000),
            dec!(1999),
            dec!(2000),
            dec!(2999),
            dec!(3000),
            dec!(4999),
            dec!(5000),
            dec!(9999),
            dec!(10000),
            dec!(19999),
            dec!(20000),
            dec!(49999),
            dec!(50000),
            dec!(74999),
            dec!(75000),
            dec!(10000000),
        ];
        for base in 1..=20 {
            let base = Decimal::from(base);
            let mut previous = base;
            for deposit in deposits {
                let risk = risk_percent(deposit, base);
                assert!(risk <= previous, "risk rose at {deposit} for base {base}");
                assert!(risk <= base);
                previous = risk;
            }
        }
    }

    #[test]
    fn test_risk_amount() {
        assert_eq!(risk_amount(dec!(400), dec!(10)), dec!(40));
        assert_eq!(risk_amount(dec!(1500), dec!(10)), dec!(120));
    }
}
