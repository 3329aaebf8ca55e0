//! Property-based tests for window resolution using proptest.
//!
//! These hold for any set of active windows, including ones that overlap each
//! other or cross midnight, not just the worked cases in `resolver_tests.rs`.

use banner_schedule::{free_gaps, resolve, ResolveResult, TimeWindow, MINUTES_PER_DAY};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any valid window: starts before midnight, lasts at most a day.
fn arb_window() -> impl Strategy<Value = TimeWindow> {
    (0u32..MINUTES_PER_DAY, 1u32..=MINUTES_PER_DAY)
        .prop_map(|(start, duration)| TimeWindow::new(start, start + duration).unwrap())
}

/// Mostly short windows, so the day is not always full.
fn arb_short_window() -> impl Strategy<Value = TimeWindow> {
    (0u32..MINUTES_PER_DAY, 15u32..=240)
        .prop_map(|(start, duration)| TimeWindow::new(start, start + duration).unwrap())
}

fn arb_active() -> impl Strategy<Value = Vec<TimeWindow>> {
    prop_oneof![
        prop::collection::vec(arb_short_window(), 0..8),
        prop::collection::vec(arb_window(), 0..4),
    ]
}

fn arb_min_duration() -> impl Strategy<Value = u32> {
    prop_oneof![Just(120u32), 0u32..=360]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property: an accepted proposal is returned unchanged and is free
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn accepted_is_unchanged_and_free(
        proposed in arb_window(),
        active in arb_active(),
        min in arb_min_duration(),
    ) {
        if let ResolveResult::Accepted(window) = resolve(proposed, &active, min) {
            prop_assert_eq!(window, proposed);
            for a in &active {
                prop_assert!(!window.overlaps_within_day(a), "{} overlaps {}", window, a);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: an adjusted window fits and overlaps nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn adjusted_fits_and_is_free(
        proposed in arb_window(),
        active in arb_active(),
        min in arb_min_duration(),
    ) {
        if let ResolveResult::Adjusted(window) = resolve(proposed, &active, min) {
            prop_assert!(window.duration() >= min.max(1));
            prop_assert!(window.start_minute() < MINUTES_PER_DAY);
            prop_assert!(window.end_minute() <= MINUTES_PER_DAY);
            for a in &active {
                prop_assert!(!window.overlaps_within_day(a), "{} overlaps {}", window, a);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: a collision is refused only when no gap is long enough
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn no_space_means_no_gap_is_long_enough(
        proposed in arb_window(),
        active in arb_active(),
        min in arb_min_duration(),
    ) {
        if resolve(proposed, &active, min) == ResolveResult::NoSpace {
            prop_assert!(!active.is_empty());
            for gap in free_gaps(&active) {
                prop_assert!(gap.duration_minutes < min.max(1), "gap {:?} was long enough", gap);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: resolution is deterministic and order-independent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolve_is_deterministic(
        proposed in arb_window(),
        active in arb_active(),
        min in arb_min_duration(),
    ) {
        let first = resolve(proposed, &active, min);
        prop_assert_eq!(first, resolve(proposed, &active, min));

        let mut reversed = active.clone();
        reversed.reverse();
        prop_assert_eq!(first, resolve(proposed, &reversed, min));
    }
}

// ---------------------------------------------------------------------------
// Property: the free gaps never overlap an active window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn gaps_are_free_and_ascending(active in arb_active()) {
        let gaps = free_gaps(&active);
        for gap in &gaps {
            prop_assert!(gap.duration_minutes > 0);
            let window = gap.window();
            for a in &active {
                prop_assert!(!window.overlaps_within_day(a), "gap {} overlaps {}", window, a);
            }
        }
        for pair in gaps.windows(2) {
            prop_assert!(pair[0].end_minute <= pair[1].start_minute);
        }
    }
}
