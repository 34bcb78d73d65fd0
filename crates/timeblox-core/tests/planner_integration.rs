//! Integration tests for the planner workflow.
//!
//! Drives the public API the way a front end would: pointer gestures feed
//! the tracker, released gestures go through the planner, confirmations are
//! committed or dropped, and the result is persisted.

use timeblox_core::{
    clock, ClockTime, Confirmation, DateKey, DayMarker, GestureOutcome, GestureTracker,
    LongPressAction, LongPressTimer, MonthKey, Outcome, PlannerState, ResizeHandle, StateFile,
    TimeBlock,
};

const PPM: f64 = 2.0;

fn date(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn at(text: &str) -> ClockTime {
    ClockTime::from_minutes(clock::parse(text))
}

fn block(title: &str, start: &str, end: &str) -> TimeBlock {
    TimeBlock::new(at(start), at(end), title, "Work", "bg-red-500")
}

fn y(text: &str) -> f64 {
    clock::parse(text) as f64 * PPM
}

fn spans(state: &PlannerState, d: DateKey) -> Vec<String> {
    state
        .schedule(d)
        .iter()
        .map(|b| format!("{}-{} {}", b.start, b.end, b.title))
        .collect()
}

#[test]
fn test_drag_onto_block_then_confirm_break_in() {
    let day = date("2024-05-14");
    let state = PlannerState::default()
        .add_block(day, block("Meeting", "10:00 AM", "11:00 AM"))
        .add_block(day, block("Call", "2:00 PM", "2:30 PM"));

    let mut tracker = GestureTracker::new();
    let schedule = state.schedule(day);
    // Grab "Call" at its top edge and drag it to 10:15 AM.
    assert!(tracker.begin_drag(&schedule, 1, y("2:00 PM"), PPM).unwrap());
    assert!(!tracker.begin_resize(&schedule, 0, ResizeHandle::Bottom, 0.0, PPM).unwrap());
    tracker.pointer_moved(&schedule, y("10:15 AM")).unwrap();

    let preview = *tracker.preview().unwrap();
    assert_eq!(preview.collision, Some(0));
    // 15-minute sliver survives, so the squish preview is shown.
    assert_eq!(preview.squish.map(|s| s.end), Some(at("10:15 AM")));

    let outcome = tracker.release(&schedule).unwrap().unwrap();
    assert!(matches!(outcome, GestureOutcome::BreakIn(_)));

    let confirmation = match state.apply_gesture(day, outcome) {
        Outcome::NeedsConfirmation(c) => c,
        Outcome::Applied(_) => panic!("break-in must be confirmed"),
    };
    assert!(matches!(confirmation, Confirmation::BreakIn { .. }));

    let next = state.confirm(confirmation).unwrap();
    assert_eq!(
        spans(&next, day),
        [
            "10:00 AM-10:15 AM Meeting",
            "10:15 AM-10:45 AM Call",
            "10:45 AM-11:00 AM Meeting"
        ]
    );
    // The original state is untouched.
    assert_eq!(state.schedule(day).len(), 2);
}

#[test]
fn test_resize_gesture_stops_at_neighbour() {
    let day = date("2024-05-14");
    let state = PlannerState::default()
        .add_block(day, block("A", "9:00 AM", "10:00 AM"))
        .add_block(day, block("B", "10:30 AM", "11:00 AM"));

    let mut tracker = GestureTracker::new();
    let schedule = state.schedule(day);
    tracker
        .begin_resize(&schedule, 0, ResizeHandle::Bottom, y("10:00 AM"), PPM)
        .unwrap();
    tracker.pointer_moved(&schedule, y("11:45 AM")).unwrap();
    let outcome = tracker.release(&schedule).unwrap().unwrap();

    let next = match state.apply_gesture(day, outcome) {
        Outcome::Applied(next) => next,
        Outcome::NeedsConfirmation(c) => panic!("unexpected {c:?}"),
    };
    assert_eq!(spans(&next, day), ["9:00 AM-10:30 AM A", "10:30 AM-11:00 AM B"]);
}

#[test]
fn test_long_press_adds_and_shortens() {
    let day = date("2024-05-14");
    let mut timer = LongPressTimer::default();

    timer.arm_empty_slot(y("8:07 AM"), PPM, 0);
    let Some(LongPressAction::AddBlockAt { start }) = timer.poll(700) else {
        panic!("long press did not fire");
    };
    let state = PlannerState::default().add_draft_block(day, start);
    assert_eq!(spans(&state, day), ["8:00 AM-9:00 AM New Task"]);
    assert_eq!(state.schedule(day).blocks()[0].category, "Work");

    timer.arm(LongPressAction::ShortenBlock { index: 0 }, 1_000);
    // A pointer move before the deadline cancels the press.
    assert!(timer.cancel());
    assert_eq!(timer.poll(5_000), None);

    let state = state.extend_block(day, 0).unwrap().shorten_block(day, 0).unwrap();
    assert_eq!(spans(&state, day), ["8:00 AM-9:00 AM New Task"]);
}

#[test]
fn test_master_copy_and_clear_cascade() {
    let a = date("2024-05-06");
    let b = date("2024-05-13");
    let c = date("2024-05-20");
    let state = PlannerState::default().add_block(a, block("Gym", "7:00 AM", "8:00 AM"));

    let state = state.begin_day_drag(a);
    let state = match state.copy_day(a, b) {
        Outcome::Applied(s) => s,
        Outcome::NeedsConfirmation(c) => panic!("unexpected {c:?}"),
    };
    let state = match state.copy_day(b, c) {
        Outcome::Applied(s) => s,
        Outcome::NeedsConfirmation(c) => panic!("unexpected {c:?}"),
    };
    assert_eq!(state.copy_links().source_of(c), Some(a));
    assert!(matches!(state.day_marker(c), Some(DayMarker::Copy { .. })));

    let Outcome::NeedsConfirmation(pending) = state.delete_master(1).unwrap() else {
        panic!("deleting a live master must be confirmed");
    };
    let state = state.confirm(pending).unwrap();
    assert!(state.copy_links().is_empty());
    assert!(state.masters().slots().iter().all(|s| s.date.is_none()));
    assert!(!state.has_schedule(a));
    assert!(state.has_schedule(b) && state.has_schedule(c));
    assert_eq!(state.day_marker(b), None);
}

#[test]
fn test_paste_month_persists() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path().join("state.json"));

    // Mondays of April 2024: 1, 8, 15, 22, 29 (a 5th Monday).
    let state = ["2024-04-01", "2024-04-08", "2024-04-29"]
        .iter()
        .fold(PlannerState::default(), |s, d| {
            s.add_block(date(d), block("Planning", "9:00 AM", "9:30 AM"))
        });
    let Outcome::NeedsConfirmation(pending) = state.paste_month(month("2024-04"), month("2024-06")) else {
        panic!("paste must be confirmed");
    };
    let state = state.confirm(pending).unwrap();
    file.save(&state).unwrap();

    let loaded = file.load_or(PlannerState::default).unwrap();
    let june: Vec<DateKey> = loaded
        .planned_dates()
        .filter(|d| month("2024-06").contains(*d))
        .collect();
    // June 2024 Mondays: 3, 10, 17, 24. No 5th Monday.
    assert_eq!(june, [date("2024-06-03"), date("2024-06-10")]);
    assert_eq!(loaded.month_links().source_of(month("2024-06")), Some(month("2024-04")));
}
