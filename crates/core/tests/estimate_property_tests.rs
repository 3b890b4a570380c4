//! Property-based integration tests for the rolling series and the shadow blend.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use fundpulse_core::estimates::blend_estimate;
use fundpulse_core::{Holding, RollingSeries, SeriesPoint};

// =============================================================================
// Generators
// =============================================================================

/// Decimal with two fractional digits in `[lo, hi]` hundredths.
fn arb_cents(lo: i64, hi: i64) -> impl Strategy<Value = Decimal> {
    (lo..=hi).prop_map(|cents| Decimal::new(cents, 2))
}

fn point(i: usize, total: Decimal) -> SeriesPoint {
    SeriesPoint {
        timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
        total_profit: total,
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The series never holds more than its capacity and keeps the newest points in order.
    #[test]
    fn prop_series_keeps_newest_points(
        capacity in 1usize..20,
        totals in proptest::collection::vec(arb_cents(-100_000, 100_000), 0..60),
    ) {
        let mut series = RollingSeries::new(capacity);
        for (i, total) in totals.iter().enumerate() {
            series.push(point(i, *total));
        }

        prop_assert!(series.len() <= capacity);
        prop_assert_eq!(series.len(), totals.len().min(capacity));

        let kept: Vec<Decimal> = series.points().iter().map(|p| p.total_profit).collect();
        let expected: Vec<Decimal> = totals[totals.len() - kept.len()..].to_vec();
        prop_assert_eq!(kept, expected);
    }

    /// Blended estimates always carry exactly two decimal places.
    #[test]
    fn prop_blend_has_two_decimals(
        weight in arb_cents(0, 10_000),
        contribution in arb_cents(-2_000, 2_000),
        anchor in arb_cents(-2_000, 2_000),
    ) {
        let estimate = blend_estimate(weight, contribution, anchor, Decimal::new(95, 2));
        prop_assert_eq!(estimate.scale(), 2);
    }

    /// With full disclosed weight the anchor index has no influence.
    #[test]
    fn prop_full_weight_ignores_anchor(
        contribution in arb_cents(-2_000, 2_000),
        anchor_a in arb_cents(-2_000, 2_000),
        anchor_b in arb_cents(-2_000, 2_000),
    ) {
        let hundred = Decimal::from(100);
        let dampening = Decimal::new(95, 2);
        prop_assert_eq!(
            blend_estimate(hundred, contribution, anchor_a, dampening),
            blend_estimate(hundred, contribution, anchor_b, dampening)
        );
    }

    /// Any six-digit code with non-negative shares is accepted; other lengths are not.
    #[test]
    fn prop_holding_code_validation(
        code in "[0-9]{1,9}",
        shares in arb_cents(0, 10_000_000),
    ) {
        let result = Holding::new(&code, "fund", shares);
        prop_assert_eq!(result.is_ok(), code.len() == 6);
    }
}
