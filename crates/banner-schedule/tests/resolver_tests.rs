//! Tests for the schedule conflict resolver.

use banner_schedule::{
    resolve, resolve_activation, ActivationOutcome, ResolveResult, ScheduleError, TimeWindow,
};

fn w(start: u32, end: u32) -> TimeWindow {
    TimeWindow::new(start, end).unwrap()
}

#[test]
fn empty_active_set_accepts_proposal() {
    let proposed = w(540, 660);
    for min in [1, 60, 120, 1440] {
        assert_eq!(resolve(proposed, &[], min), ResolveResult::Accepted(proposed));
    }
}

#[test]
fn non_overlapping_proposal_passes_through_unchanged() {
    // 09:00-10:00 and 12:00-13:00 are taken; 10:00-12:00 is free.
    let active = [w(540, 600), w(720, 780)];
    let proposed = w(600, 720);

    assert_eq!(resolve(proposed, &active, 120), ResolveResult::Accepted(proposed));
}

#[test]
fn adjacent_windows_do_not_conflict() {
    let active = [w(540, 600)];
    assert_eq!(resolve(w(600, 660), &active, 60), ResolveResult::Accepted(w(600, 660)));
    assert_eq!(resolve(w(480, 540), &active, 60), ResolveResult::Accepted(w(480, 540)));
}

#[test]
fn conflict_returns_first_gap_that_fits() {
    // 09:00-10:00 and 12:00-13:00 are live; 10:00-12:00 is the first gap
    // the sweep meets.
    let active = [w(540, 600), w(720, 780)];
    let proposed = w(550, 650);

    let result = resolve(proposed, &active, 60);
    assert_eq!(result, ResolveResult::Adjusted(w(600, 720)));
    assert_eq!(result.window().unwrap().duration(), 120);
}

#[test]
fn gaps_too_short_are_skipped() {
    // [600,720) is only 120 minutes, so the tail [780,1440) is used.
    let active = [w(0, 600), w(720, 780)];
    let result = resolve(w(550, 650), &active, 150);
    assert_eq!(result, ResolveResult::Adjusted(w(780, 1440)));
}

#[test]
fn leading_gap_is_tried_after_the_tail() {
    let active = [w(540, 600)];
    assert_eq!(resolve(w(550, 650), &active, 60), ResolveResult::Adjusted(w(600, 1440)));

    // Nothing free after the window: the sweep wraps to the morning.
    let active = [w(540, 1440)];
    assert_eq!(resolve(w(550, 650), &active, 60), ResolveResult::Adjusted(w(0, 540)));
}

#[test]
fn first_fit_not_best_fit() {
    // Gap A [600,720) is 120 minutes, gap B [780,1440) is 660 minutes.
    // With min 90, A is the first to fit even though B is larger.
    let active = [w(0, 600), w(720, 780)];
    let result = resolve(w(700, 760), &active, 90);
    assert_eq!(result, ResolveResult::Adjusted(w(600, 720)));
}

#[test]
fn whole_gap_is_returned_not_a_minimal_slice() {
    let active = [w(0, 300), w(900, 1440)];
    let result = resolve(w(200, 400), &active, 60);
    assert_eq!(result, ResolveResult::Adjusted(w(300, 900)));
}

#[test]
fn tail_gap_is_found_after_last_window() {
    let active = [w(0, 600)];
    let result = resolve(w(500, 700), &active, 600);
    assert_eq!(result, ResolveResult::Adjusted(w(600, 1440)));
    assert_eq!(result.window().unwrap().duration(), 840);
}

#[test]
fn no_space_when_every_gap_is_too_small() {
    // Hourly blocks with 30-minute gaps between them, tiling the day.
    let active: Vec<TimeWindow> = (0..16).map(|i| w(i * 90, i * 90 + 60)).collect();
    let result = resolve(w(0, 60), &active, 120);
    assert_eq!(result, ResolveResult::NoSpace);
    assert!(result.window().is_none());
}

#[test]
fn no_space_when_day_is_fully_booked() {
    let active = [w(0, 720), w(720, 1440)];
    assert_eq!(resolve(w(100, 200), &active, 1), ResolveResult::NoSpace);
}

#[test]
fn unsorted_input_is_searched_in_start_order() {
    let active = [w(720, 780), w(0, 600)];
    assert_eq!(resolve(w(550, 650), &active, 60), ResolveResult::Adjusted(w(600, 720)));
}

#[test]
fn overlapping_active_windows_are_merged_during_the_sweep() {
    // [0,700) swallows [100,200); the first gap starts at 700, not 200.
    let active = [w(0, 700), w(100, 200), w(900, 1440)];
    assert_eq!(resolve(w(650, 750), &active, 60), ResolveResult::Adjusted(w(700, 900)));
}

#[test]
fn resolve_is_pure_and_repeatable() {
    let active = vec![w(720, 780), w(540, 600)];
    let snapshot = active.clone();
    let proposed = w(550, 650);

    let first = resolve(proposed, &active, 60);
    let second = resolve(proposed, &active, 60);

    assert_eq!(first, second);
    assert_eq!(active, snapshot, "input must not be reordered");
}

#[test]
fn proposal_after_midnight_collides_with_window_crossing_midnight() {
    // 23:00-01:00 is live; 00:30-01:30 must be seen as overlapping.
    let active = [w(1380, 1500)];
    let result = resolve(w(30, 90), &active, 60);
    assert!(matches!(result, ResolveResult::Adjusted(_)), "got {:?}", result);
}

#[test]
fn adjusted_window_avoids_wrapped_part_of_midnight_window() {
    // 23:00-02:00 also occupies 00:00-02:00 of the same day.
    let active = [w(1380, 1560)];
    let result = resolve(w(60, 180), &active, 60);
    assert_eq!(result, ResolveResult::Adjusted(w(120, 1380)));
}

#[test]
fn zero_minimum_is_treated_as_one_minute() {
    let active = [w(0, 720), w(720, 1439)];
    assert_eq!(resolve(w(0, 10), &active, 0), ResolveResult::Adjusted(w(1439, 1440)));
}

// ── Boundary function ───────────────────────────────────────────────────────

#[test]
fn resolve_activation_accepts_raw_pairs() {
    let outcome = resolve_activation("b1", (550, 650), &[(540, 600), (720, 780)], 60).unwrap();
    assert_eq!(outcome, ActivationOutcome::Adjusted { window: w(600, 720) });

    let outcome = resolve_activation("b1", (600, 720), &[(540, 600), (720, 780)], 120).unwrap();
    assert_eq!(outcome, ActivationOutcome::Accepted { window: w(600, 720) });
}

#[test]
fn resolve_activation_reports_no_space_as_outcome() {
    let outcome = resolve_activation("b1", (10, 20), &[(0, 1440)], 120).unwrap();
    assert_eq!(outcome, ActivationOutcome::NoSpace);
}

#[test]
fn resolve_activation_rejects_malformed_windows() {
    let err = resolve_activation("b1", (600, 600), &[], 120).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidWindow { .. }));

    let err = resolve_activation("b1", (1440, 1500), &[], 120).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidWindow { .. }));

    let err = resolve_activation("b1", (-5, 60), &[], 120).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidWindow { .. }));

    let err = resolve_activation("b1", (60, 120), &[(300, 200)], 120).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidWindow { .. }));
}

#[test]
fn resolve_activation_rejects_zero_minimum() {
    let err = resolve_activation("b1", (60, 120), &[], 0).unwrap_err();
    assert_eq!(err, ScheduleError::InvalidDuration(0));
}

#[test]
fn outcome_serializes_with_outcome_tag() {
    let adjusted = ActivationOutcome::Adjusted { window: w(600, 720) };
    let json = serde_json::to_value(adjusted).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"outcome": "adjusted", "window": {"startMinute": 600, "endMinute": 720}})
    );

    let json = serde_json::to_value(ActivationOutcome::NoSpace).unwrap();
    assert_eq!(json, serde_json::json!({"outcome": "no_space"}));
}

#[test]
fn request_json_defaults_min_slot_to_two_hours() {
    let request: banner_schedule::ActivationRequest = serde_json::from_str(
        r#"{"bannerId":"b1","proposedWindow":{"startMinute":550,"endMinute":650},
            "otherActiveWindows":[{"startMinute":0,"endMinute":600},{"startMinute":720,"endMinute":780}]}"#,
    )
    .unwrap();
    assert_eq!(request.min_slot_minutes, 120);

    // Gap [600,720) is exactly 120 minutes.
    let outcome = banner_schedule::resolve_request(&request).unwrap();
    assert_eq!(outcome, ActivationOutcome::Adjusted { window: w(600, 720) });
}
