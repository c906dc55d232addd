//! Efficiency scoring.
//!
//! 4 pays and 60 calls each count as 100% of their sub-metric. The score is
//! the plain average of the two capped percentages, rounded half-to-even.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Pays needed for a full pay sub-score.
pub const PAYS_TARGET: u32 = 4;

/// Calls needed for a full call sub-score.
pub const CALLS_TARGET: u32 = 60;

const FULL: Decimal = dec!(100);

/// Percentage of `target` reached by `value`, capped at 100.
fn attainment(value: u32, target: u32) -> Decimal {
    (Decimal::from(value) * FULL / Decimal::from(target)).min(FULL)
}

/// Score in `0..=100` for the given figures.
pub fn score(pays: u32, calls: u32) -> u32 {
    let average = (attainment(pays, PAYS_TARGET) + attainment(calls, CALLS_TARGET)) / dec!(2);
    average
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u32()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_figures_score_zero() {
        assert_eq!(score(0, 0), 0);
    }

    #[test]
    fn half_targets_score_fifty() {
        assert_eq!(score(2, 30), 50);
    }

    #[test]
    fn exact_targets_score_hundred() {
        assert_eq!(score(4, 60), 100);
    }

    #[test]
    fn over_performance_is_capped_per_axis() {
        // 10 pays is still only 100% on the pay axis.
        assert_eq!(score(10, 0), 50);
        assert_eq!(score(0, 600), 50);
    }

    #[test]
    fn mixed_figures() {
        // 50% pays, 75% calls -> 62.5
        assert_eq!(score(2, 45), 62);
        // 50% pays, 80% calls.
        assert_eq!(score(2, 48), 65);
        // 100% pays, 100% calls (70 calls is capped).
        assert_eq!(score(4, 70), 100);
    }

    #[test]
    fn midpoint_rounds_to_even() {
        // 25% pays, 0% calls -> 12.5
        assert_eq!(score(1, 0), 12);
        // 75% pays, 0% calls -> 37.5
        assert_eq!(score(3, 0), 38);
    }

    #[test]
    fn fractional_call_share_rounds_to_nearest() {
        // 0% pays, 1/60 -> 1.666..% calls -> 0.833.. -> 1
        assert_eq!(score(0, 1), 1);
    }

    proptest! {
        #[test]
        fn score_stays_in_range(pays in 0u32..10_000, calls in 0u32..100_000) {
            let s = score(pays, calls);
            prop_assert!(s <= 100);
        }

        #[test]
        fn meeting_both_targets_is_full_score(pays in 4u32..10_000, calls in 60u32..100_000) {
            prop_assert_eq!(score(pays, calls), 100);
        }

        #[test]
        fn score_is_deterministic(pays in 0u32..1_000, calls in 0u32..1_000) {
            prop_assert_eq!(score(pays, calls), score(pays, calls));
        }
    }
}
